use chrono::Utc;
use uuid::Uuid;

/// Generates a fresh table name: `<unix-seconds>_<uuid-v4>`.
///
/// Only digits, lowercase hex, `-` and `_`, all valid in DynamoDB table names.
pub fn generate_table_name() -> String {
    format!("{}_{}", Utc::now().timestamp(), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_shape() {
        let name = generate_table_name();
        let (seconds, id) = name.split_once('_').unwrap();

        assert!(seconds.parse::<i64>().unwrap() > 0);
        assert!(Uuid::parse_str(id).is_ok());
        assert!(name.len() <= 255);
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_names_are_unique() {
        assert_ne!(generate_table_name(), generate_table_name());
    }
}
