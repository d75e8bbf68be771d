//! Human-readable draft summaries sent back to the chat.

use crate::domain::foundation::format_rupiah;
use crate::domain::ledger::{
    effective_category, Category, TransactionKind, TransactionLine, DEFAULT_CATEGORY_NAME,
};

/// Shown when extraction yields no lines.
pub const NO_TRANSACTIONS: &str = "Tidak ada transaksi yang terdeteksi.";

/// Invitation appended to every non-empty summary.
pub const CALL_TO_ACTION: &str = "Balas dengan _'save'_, _'edit'_, atau _'cancel'_.";

/// Renders one block per line plus the save/edit/cancel invitation.
///
/// Category names shown are the ones the line will actually be committed
/// under, so an unknown id displays the fallback category.
pub fn render_summary(lines: &[TransactionLine], catalog: &[Category]) -> String {
    if lines.is_empty() {
        return NO_TRANSACTIONS.to_string();
    }

    let mut out = String::from("*Summary:*\n\n");
    for line in lines {
        let marker = match line.kind {
            TransactionKind::Expense => "✅ Tercatat pengeluaran",
            TransactionKind::Income => "💰 Tercatat pemasukan",
        };
        let category = effective_category(catalog, line.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY_NAME);

        out.push_str(marker);
        out.push('\n');
        out.push_str(&format!(" n: {}\n", line.description));
        out.push_str(&format!(" a: {}\n", format_rupiah(line.amount)));
        out.push_str(&format!(" c: {}\n\n", category));
    }
    out.push('\n');
    out.push_str(CALL_TO_ACTION);
    out
}
