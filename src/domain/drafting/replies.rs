//! Fixed chat replies, one per outcome.

pub const PROCESSING_FAILED: &str = "Maaf, terjadi kesalahan saat memproses permintaan Anda.";
pub const SAVED: &str = "Transaksi berhasil disimpan.";
pub const SAVE_FAILED: &str = "Maaf, terjadi kesalahan saat menyimpan transaksi.";
pub const USER_FAILED: &str = "Maaf, terjadi kesalahan saat memproses pengguna.";
pub const CATEGORY_FAILED: &str = "Maaf, terjadi kesalahan saat memvalidasi kategori.";
pub const INVALID_AMOUNT: &str =
    "Maaf, jumlah transaksi harus lebih dari 0. Balas dengan _'edit'_ untuk memperbaikinya.";
pub const NOTHING_TO_SAVE: &str =
    "Tidak ada transaksi untuk disimpan. Balas dengan _'edit'_ untuk menambahkan atau _'cancel'_.";
pub const REVISION_NOT_STORED: &str = "Maaf, perubahan draft gagal disimpan. \
Silakan balas ringkasan sebelumnya untuk mencoba lagi.";
pub const CANCELLED: &str = "Draft transaksi telah dibatalkan.";
pub const CANCEL_FAILED: &str = "Maaf, terjadi kesalahan saat membatalkan draft.";
pub const UNKNOWN_ACTION: &str = "Maaf, saya tidak mengerti tindakan yang Anda maksud. \
Silakan balas dengan 'save', 'edit', atau 'cancel'.";

/// Reply for a quote that matches no pending draft.
pub fn draft_not_found(trigger_tag: &str) -> String {
    if trigger_tag.is_empty() {
        "Draft transaksi tidak ditemukan atau sudah diproses. Silakan kirim ulang transaksi Anda."
            .to_string()
    } else {
        format!(
            "Draft transaksi tidak ditemukan atau sudah diproses. \
             Silakan kirim ulang transaksi Anda dengan {}.",
            trigger_tag
        )
    }
}
