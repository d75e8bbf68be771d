//! Prompts and the structured output contract for transaction extraction.

use serde_json::{json, Value};

use crate::domain::ledger::{catalog_listing, Category, TransactionLine};

/// Instruction for photographed receipts, invoices, and statements.
pub const IMAGE_INSTRUCTION: &str = "Extract financial transactions from this image \
(receipt, invoice, bank statement, shopping list, etc).";

const SCHEMA_SUFFIX: &str = "Extract with JSON schema.";

/// Prompt for a fresh free-text request.
pub fn text_prompt(input: &str, catalog: &[Category]) -> String {
    format!(
        "Extract financial transactions from this input text.\n\n\
         INPUT: \"{}\"\n\n\
         {}\
         {}",
        input.trim(),
        categories_block(catalog),
        SCHEMA_SUFFIX
    )
}

/// Prompt for a photographed document.
pub fn image_prompt(catalog: &[Category]) -> String {
    format!(
        "{}\n\n{}{}",
        IMAGE_INSTRUCTION,
        categories_block(catalog),
        SCHEMA_SUFFIX
    )
}

/// Prompt that merges a user's correction into an existing proposal.
///
/// The existing lines are embedded verbatim as JSON so the provider sees the
/// complete set it has to preserve.
pub fn edit_prompt(
    existing: &[TransactionLine],
    input: &str,
    catalog: &[Category],
) -> Result<String, serde_json::Error> {
    let existing_json = serde_json::to_string(&json!({ "transactions": existing }))?;

    Ok(format!(
        "Merge and update transactions based on user input.\n\n\
         EXISTING DATA: {}\n\n\
         NEW INPUT: \"{}\"\n\n\
         RULES:\n\
         - Keep ALL existing transactions\n\
         - A transaction is mentioned when the input contains its description or part of it, ignoring case\n\
         - UPDATE mentioned transactions (replace kind, amount, category or description as the input says)\n\
         - ADD new transactions for anything in the input that matches no existing transaction\n\
         - If input doesn't mention existing transaction, KEEP it unchanged\n\
         - Never drop a transaction\n\n\
         {}\
         {}",
        existing_json,
        input.trim(),
        categories_block(catalog),
        SCHEMA_SUFFIX
    ))
}

fn categories_block(catalog: &[Category]) -> String {
    if catalog.is_empty() {
        return String::new();
    }
    format!("CATEGORIES: {}\n\n", catalog_listing(catalog))
}

/// Output contract handed to the provider.
///
/// Plain JSON-Schema vocabulary; adapters translate it to their provider's
/// dialect.
pub fn transaction_schema(catalog: &[Category]) -> Value {
    let category_hint = if catalog.is_empty() {
        "Category ID".to_string()
    } else {
        format!("Category ID: {}", catalog_listing(catalog))
    };

    json!({
        "type": "object",
        "properties": {
            "transactions": {
                "type": "array",
                "description": "List of extracted transactions",
                "items": {
                    "type": "object",
                    "properties": {
                        "kind": {
                            "type": "string",
                            "enum": ["EXPENSE", "INCOME"],
                            "description": "Transaction type"
                        },
                        "amount": {
                            "type": "integer",
                            "description": "Amount in Rupiah without separators"
                        },
                        "category_id": {
                            "type": "integer",
                            "description": category_hint
                        },
                        "description": {
                            "type": "string",
                            "description": "Short description of the transaction"
                        }
                    },
                    "required": ["kind", "amount", "category_id", "description"]
                }
            }
        },
        "required": ["transactions"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Category> {
        vec![Category::new(1, "Makanan"), Category::new(2, "Transport")]
    }

    #[test]
    fn text_prompt_embeds_input_and_catalog() {
        let prompt = text_prompt("  beli kopi 15000 ", &catalog());
        assert!(prompt.contains("INPUT: \"beli kopi 15000\""));
        assert!(prompt.contains("CATEGORIES: 1=Makanan, 2=Transport"));
        assert!(prompt.ends_with("Extract with JSON schema."));
    }

    #[test]
    fn image_prompt_without_catalog_skips_block() {
        let prompt = image_prompt(&[]);
        assert!(prompt.starts_with(IMAGE_INSTRUCTION));
        assert!(!prompt.contains("CATEGORIES"));
    }

    #[test]
    fn edit_prompt_carries_every_existing_line() {
        let existing = vec![
            TransactionLine::expense(15000, 1, "kopi"),
            TransactionLine::income(500000, 2, "gaji"),
        ];
        let prompt = edit_prompt(&existing, "kopi jadi 20000", &catalog()).unwrap();
        assert!(prompt.contains("\"description\":\"kopi\""));
        assert!(prompt.contains("\"description\":\"gaji\""));
        assert!(prompt.contains("NEW INPUT: \"kopi jadi 20000\""));
        assert!(prompt.contains("Keep ALL existing transactions"));
    }

    #[test]
    fn schema_lists_catalog_in_category_description() {
        let schema = transaction_schema(&catalog());
        let desc = &schema["properties"]["transactions"]["items"]["properties"]["category_id"]
            ["description"];
        assert_eq!(desc, "Category ID: 1=Makanan, 2=Transport");
        assert_eq!(
            schema["properties"]["transactions"]["items"]["required"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }
}
