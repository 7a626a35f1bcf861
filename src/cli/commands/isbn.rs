use anyhow::Result;

use super::Command;
use crate::isbn::{normalize_isbn, Isbn13};

pub struct IsbnCommand {
    pub value: String,
}

impl IsbnCommand {
    pub fn new(value: String) -> Self {
        Self { value }
    }
}

impl Command for IsbnCommand {
    async fn execute(&self) -> Result<()> {
        let normalized = normalize_isbn(&self.value);
        match Isbn13::parse(&self.value) {
            Ok(isbn) => {
                println!("✅ Valid ISBN-13");
                println!("   Digits:     {}", isbn.as_str());
                println!("   Hyphenated: {isbn}");
            }
            Err(e) => {
                println!("❌ Invalid ISBN-13: {e}");
                println!("   Normalized input: {normalized:?}");
            }
        }
        Ok(())
    }
}
