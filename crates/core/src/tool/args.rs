use aiagent_model::ArgValue;
use serde_json::Value;

use super::ToolArguments;
use crate::Error;

/// Parses the raw arguments of a tool call into named values.
///
/// Blank input is an empty argument set. Anything that is not a JSON object
/// is an [`crate::ErrorKind::ArgumentParse`] error. Arguments are flat:
/// nested objects and arrays become [`ArgValue::Null`].
pub fn parse_arguments(raw: &str) -> Result<ToolArguments, Error> {
    if raw.trim().is_empty() {
        return Ok(ToolArguments::new());
    }
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| Error::argument_parse().with_reason(format!("{err}")))?;
    let Value::Object(map) = value else {
        return Err(Error::argument_parse()
            .with_reason(format!("expected a JSON object, got `{raw}`")));
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| (key, scalar(value)))
        .collect())
}

fn scalar(value: Value) -> ArgValue {
    match value {
        Value::Object(_) | Value::Array(_) => ArgValue::Null,
        value => ArgValue::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_flat_object() {
        let args = parse_arguments(
            r#"{"location": "Paris", "days": 2, "metric": true, "note": null}"#,
        )
        .unwrap();
        assert_eq!(args.len(), 4);
        assert_eq!(args["location"], ArgValue::from("Paris"));
        assert_eq!(args["days"], ArgValue::Number(2.0));
        assert_eq!(args["metric"], ArgValue::Bool(true));
        assert_eq!(args["note"], ArgValue::Null);
    }

    #[test]
    fn test_nested_values_are_null() {
        let args = parse_arguments(
            r#"{"city": "Oslo", "coords": {"lat": 59.9}, "tags": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(args["city"], ArgValue::from("Oslo"));
        assert_eq!(args["coords"], ArgValue::Null);
        assert_eq!(args["tags"], ArgValue::Null);
    }

    #[test]
    fn test_blank() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("  ").unwrap().is_empty());
    }

    #[test]
    fn test_invalid() {
        let err = parse_arguments("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentParse);

        let err = parse_arguments("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentParse);

        let err = parse_arguments("\"text\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentParse);
    }
}
