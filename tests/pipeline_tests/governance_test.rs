use std::io::Write;

use pretty_assertions::assert_eq;
use rift::{
    config::{Governance, Stage, StaticGovernance},
    renderer::config::OutputFormat,
    run_pipeline, Pipeline, PipelineError,
};

const JSON_GOVERNANCE: &str = r#"{
    "stages": {
        "tokenizer": {
            "stage_name": "TOKENIZER",
            "sp_alignment": "LEXICAL_ANALYSIS",
            "sections": {
                "TOKEN_PATTERNS": [
                    { "key": "IDENTIFIER_PATTERN", "value": "[a-zA-Z_]\\w*" },
                    { "key": "IDENTIFIER_PRIORITY", "value": "100" },
                    { "key": "NUMBER_PATTERN", "value": "\\d+(\\.\\d+)?" },
                    { "key": "NUMBER_PRIORITY", "value": "90" },
                    { "key": "OPERATOR_PATTERN", "value": "[+\\-*/]" },
                    { "key": "OPERATOR_PRIORITY", "value": "80" }
                ]
            }
        },
        "coordinator": {
            "stage_name": "AST_COORDINATOR",
            "sections": {
                "OPTIMIZATION_PASSES": [
                    { "key": "constant_folding", "value": "off" }
                ]
            }
        },
        "renderer": {
            "stage_name": "OUTPUT_GENERATOR",
            "sections": {
                "OUTPUT_FORMATS": [
                    { "key": "primary_format", "value": "JSON" }
                ]
            }
        }
    }
}"#;

#[test]
fn test_pipeline_from_json_governance() {
    let governance: StaticGovernance = JSON_GOVERNANCE.parse().unwrap();
    assert_eq!(
        governance.stage_config(Stage::Tokenizer).unwrap().governance_version,
        "1.0.0"
    );

    let pipeline = Pipeline::from_governance(&governance).unwrap();
    let output = pipeline.run("2 + 3").unwrap();
    assert!(output.applied_passes.is_empty());
    assert_eq!(output.node_count, 3);
    assert!(output.json.is_none());

    let value: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(value["BinaryOp"]["op"], "+");
    assert_eq!(value["BinaryOp"]["left"]["Number"], "2");
}

#[test]
fn test_pipeline_from_governance_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(JSON_GOVERNANCE.as_bytes()).unwrap();

    let governance = StaticGovernance::from_file(file.path()).unwrap();
    assert_eq!(
        governance.loaded_stages().collect::<Vec<_>>(),
        vec![Stage::Tokenizer, Stage::Coordinator, Stage::Renderer]
    );
    assert!(run_pipeline("a * b", &governance).is_ok());
}

#[test]
fn test_invalid_output_format() {
    let json = JSON_GOVERNANCE.replace(r#""value": "JSON""#, r#""value": "XML""#);
    let governance: StaticGovernance = json.parse().unwrap();
    let err = run_pipeline("a", &governance).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Renderer));
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn test_malformed_governance_json() {
    let err = "{ not json".parse::<StaticGovernance>().unwrap_err();
    assert!(err.stage().is_none());
    assert_eq!(PipelineError::from(err).stage(), None);
}

#[test]
fn test_output_format_names() {
    assert_eq!(OutputFormat::LispStyleAst.to_string(), "LISP_STYLE_AST");
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
}
