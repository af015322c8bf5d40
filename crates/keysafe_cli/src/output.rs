//! Plain-text and JSON rendering of command results.

use keysafe_core::SecretRecord;
use serde::Serialize;
use serde_json::json;

/// Record fields safe to print in listings.
#[derive(Debug, Serialize)]
struct RecordSummary<'a> {
    id: Option<i64>,
    name: &'a str,
    login: &'a str,
}

impl<'a> From<&'a SecretRecord> for RecordSummary<'a> {
    fn from(record: &'a SecretRecord) -> Self {
        Self {
            id: record.id.map(|id| id.0),
            name: &record.name,
            login: &record.login,
        }
    }
}

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.render_status(true, message));
    }

    /// Text-mode failures go to stderr; JSON always goes to stdout.
    pub fn failure(&self, message: &str) {
        let line = self.render_status(false, message);
        if self.json {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }

    pub fn names(&self, records: &[SecretRecord]) {
        println!("{}", self.render_names(records));
    }

    pub fn record(&self, record: &SecretRecord) {
        println!("{}", self.render_record(record));
    }

    fn render_status(&self, ok: bool, message: &str) -> String {
        if self.json {
            json!({ "ok": ok, "message": message }).to_string()
        } else {
            message.to_string()
        }
    }

    fn render_names(&self, records: &[SecretRecord]) -> String {
        if self.json {
            let summaries: Vec<RecordSummary<'_>> = records.iter().map(Into::into).collect();
            json!({ "ok": true, "records": summaries }).to_string()
        } else if records.is_empty() {
            "No entries yet.".to_string()
        } else {
            records
                .iter()
                .map(|record| record.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    fn render_record(&self, record: &SecretRecord) -> String {
        if self.json {
            json!({ "ok": true, "record": record }).to_string()
        } else {
            format!(
                "Name: {}\nLogin: {}\nSecret: {}",
                record.name, record.login, record.secret
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Output;
    use keysafe_core::{RecordId, SecretRecord};
    use serde_json::Value;

    fn stored(id: i64, name: &str) -> SecretRecord {
        let mut record = SecretRecord::new(name, "me", "token");
        record.id = Some(RecordId(id));
        record
    }

    #[test]
    fn json_listing_carries_summaries_without_secrets() {
        let rendered = Output::new(true).render_names(&[stored(1, "github"), stored(2, "email")]);
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["ok"], true);
        let records = value["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], 1);
        assert_eq!(records[0]["name"], "github");
        assert_eq!(records[0]["login"], "me");
        assert!(records[0].get("secret").is_none());
    }

    #[test]
    fn json_record_includes_secret() {
        let rendered = Output::new(true).render_record(&stored(3, "github"));
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["ok"], true);
        assert_eq!(value["record"]["id"], 3);
        assert_eq!(value["record"]["secret"], "token");
    }

    #[test]
    fn json_status_reports_ok_flag_and_message() {
        let rendered = Output::new(true).render_status(false, "Name already exists. Please retry.");
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["ok"], false);
        assert_eq!(value["message"], "Name already exists. Please retry.");
    }

    #[test]
    fn text_listing_prints_one_name_per_line() {
        let out = Output::new(false);
        assert_eq!(out.render_names(&[]), "No entries yet.");
        assert_eq!(
            out.render_names(&[stored(1, "github"), stored(2, "email")]),
            "github\nemail"
        );
    }
}
