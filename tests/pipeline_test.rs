//! Integration tests for loading, labeling and training.

use std::io::Write;

use sentix::dataset::Dataset;
use sentix::dataset::loader::{CsvLoader, DataConfig, load_dataset};
use sentix::dataset::record::Sentiment;
use sentix::error::{Result, SentixError};
use sentix::model::{TrainingConfig, fit_explanation_pipeline, train_and_evaluate};
use tempfile::NamedTempFile;

const POSITIVE: [&str; 10] = [
    "caneca grande de cerâmica",
    "conjunto de canecas grandes",
    "caixa com doze canecas",
    "lote de pratos decorativos",
    "pacote de luzes de natal",
    "conjunto de xícaras de chá",
    "lote de lanternas de jardim",
    "caixa de papel de embrulho",
    "pacote de velas perfumadas",
    "kit de taças de vidro",
];

const NEGATIVE: [&str; 10] = [
    "devolução de caneca quebrada",
    "pedido cancelado pelo cliente",
    "devolução de prato trincado",
    "desconto por defeito",
    "item danificado devolvido",
    "cancelamento de pedido duplicado",
    "devolução por atraso",
    "produto com defeito devolvido",
    "estorno de pagamento",
    "pedido cancelado por erro",
];

const NEUTRAL: [&str; 10] = [
    "vaso azul pequeno",
    "porta retrato de madeira",
    "almofada bordada",
    "relógio de parede",
    "quadro decorativo",
    "cesta de vime",
    "espelho redondo",
    "toalha de mesa",
    "abajur de cabeceira",
    "tapete de banheiro",
];

/// Encode as ISO-8859-1, the encoding of the transaction exports.
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

/// A transaction export with 30 labeled rows and one blank description.
fn write_export() -> NamedTempFile {
    let mut csv = String::from("InvoiceNo,StockCode,Description,Quantity,UnitPrice\n");
    for i in 0..10 {
        csv.push_str(&format!("5000{i},A{i},{},{},1.25\n", POSITIVE[i], 12 + i * 4));
        csv.push_str(&format!("C5001{i},B{i},{},-{},2.50\n", NEGATIVE[i], 1 + i % 5));
        csv.push_str(&format!("5002{i},C{i},{},{},0.85\n", NEUTRAL[i], i % 11));
    }
    csv.push_str("50030,D0,,24,1.00\n");

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&latin1(&csv)).unwrap();
    file.flush().unwrap();
    file
}

fn config_for(file: &NamedTempFile) -> DataConfig {
    DataConfig {
        path: file.path().to_path_buf(),
        ..DataConfig::default()
    }
}

#[test]
fn test_load_labels_and_decodes_latin1() -> Result<()> {
    let file = write_export();
    let dataset = load_dataset(&config_for(&file))?;

    assert_eq!(dataset.len(), 30);
    let counts = dataset.label_counts();
    assert_eq!(counts[&Sentiment::Positive], 10);
    assert_eq!(counts[&Sentiment::Negative], 10);
    assert_eq!(counts[&Sentiment::Neutral], 10);

    let descriptions = dataset.descriptions();
    assert!(descriptions.contains(&"devolução de caneca quebrada".to_string()));
    assert!(descriptions.contains(&"relógio de parede".to_string()));

    Ok(())
}

#[test]
fn test_cleaned_text_has_no_stopwords_or_punctuation() -> Result<()> {
    let file = write_export();
    let dataset = load_dataset(&config_for(&file))?;

    for record in dataset.records() {
        for token in record.clean_text.split(' ') {
            assert!(!["de", "com", "por", "pelo"].contains(&token), "{}", record.clean_text);
            assert!(token.chars().all(|c| c.is_alphanumeric() || c == '_'));
        }
    }

    Ok(())
}

#[test]
fn test_train_and_evaluate_on_export() -> Result<()> {
    let file = write_export();
    let dataset = load_dataset(&config_for(&file))?;
    let outcome = train_and_evaluate(&dataset, &TrainingConfig::default())?;

    assert_eq!(outcome.train_size, 24);
    assert_eq!(outcome.test_size, 6);
    assert_eq!(outcome.report.support(), 6);
    for class in &outcome.report.classes {
        assert_eq!(class.support, 2, "{}", class.label);
        assert!((0.0..=1.0).contains(&class.f1));
    }
    assert!((0.0..=1.0).contains(&outcome.report.accuracy));

    Ok(())
}

#[test]
fn test_fixed_seed_gives_identical_reports() -> Result<()> {
    let file = write_export();
    let dataset = load_dataset(&config_for(&file))?;
    let config = TrainingConfig::default();

    let first = train_and_evaluate(&dataset, &config)?;
    let second = train_and_evaluate(&dataset, &config)?;

    assert_eq!(first.report, second.report);
    assert_eq!(first.report.to_string(), second.report.to_string());

    Ok(())
}

#[test]
fn test_class_with_one_row_fails_split() {
    let dataset = Dataset::from_rows(vec![
        ("ótimo produto", 15),
        ("caneca grande", 20),
        ("produto pessimo", -5),
        ("produto comum", 3),
        ("vaso azul", 4),
    ])
    .unwrap();

    let err = train_and_evaluate(&dataset, &TrainingConfig::default()).unwrap_err();
    assert!(matches!(err, SentixError::Data(_)));
    assert!(err.to_string().contains("negative"));
}

#[test]
fn test_quantity_rule_on_small_dataset() {
    let dataset = Dataset::from_rows(vec![
        ("ótimo produto", 15),
        ("produto pessimo", -5),
        ("produto comum", 3),
    ])
    .unwrap();

    assert_eq!(
        dataset.labels(),
        vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
    );
}

#[test]
fn test_missing_column_and_missing_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Description,Price").unwrap();
    writeln!(file, "caneca,2.5").unwrap();
    file.flush().unwrap();

    let err = CsvLoader::new().load(file.path()).unwrap_err();
    assert!(err.is_input_error());
    assert!(err.to_string().contains("Quantity"));

    let config = DataConfig {
        path: "/nonexistent/dataset/data.csv".into(),
        ..DataConfig::default()
    };
    assert!(load_dataset(&config).unwrap_err().is_input_error());
}

#[test]
fn test_explanation_pipeline_predicts_known_words() -> Result<()> {
    let file = write_export();
    let dataset = load_dataset(&config_for(&file))?;
    let pipeline = fit_explanation_pipeline(&dataset, &TrainingConfig::default())?;

    assert_eq!(pipeline.classes(), &Sentiment::ALL);
    assert_eq!(pipeline.predict("devolução cancelado defeito")?, Sentiment::Negative);

    let proba = pipeline.predict_proba("caixa de canecas")?;
    let total: f64 = proba.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);

    Ok(())
}
