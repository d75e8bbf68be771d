//! ReconciliationEngine - proposes transaction lines from chat input.
//!
//! Builds prompts against the current category catalog, calls the extraction
//! provider, and parses its output into lines plus the summary shown to the
//! user. Merging an edit into an existing proposal is delegated to the
//! provider; the engine only checks that the merge kept every line.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::drafting::{
    edit_prompt, image_prompt, parse_lines, render_summary, text_prompt, transaction_schema,
    DraftingError,
};
use crate::domain::foundation::Timestamp;
use crate::domain::ledger::{Category, TransactionLine};
use crate::ports::{
    CategoryRepository, ExtractionProvider, ImageAttachment, PromptLog, PromptLogEntry,
    StructuredCompletion, StructuredRequest,
};

/// Lines extracted from one input and the summary rendered for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub lines: Vec<TransactionLine>,
    pub summary: String,
}

/// Orchestrates prompt building, provider calls, and output validation.
pub struct ReconciliationEngine {
    provider: Arc<dyn ExtractionProvider>,
    categories: Arc<dyn CategoryRepository>,
    prompt_log: Arc<dyn PromptLog>,
}

impl ReconciliationEngine {
    pub fn new(
        provider: Arc<dyn ExtractionProvider>,
        categories: Arc<dyn CategoryRepository>,
        prompt_log: Arc<dyn PromptLog>,
    ) -> Self {
        Self {
            provider,
            categories,
            prompt_log,
        }
    }

    /// Proposes lines for a fresh free-text request.
    pub async fn propose_from_text(&self, free_text: &str) -> Result<Proposal, DraftingError> {
        let catalog = self.catalog().await?;
        let prompt = text_prompt(free_text, &catalog);
        let lines = self
            .extract(StructuredRequest::new(prompt, transaction_schema(&catalog)))
            .await?;
        Ok(Self::proposal(lines, &catalog))
    }

    /// Proposes lines for a photographed receipt, invoice, or statement.
    ///
    /// An image with nothing recognisable yields an empty proposal, which is a
    /// valid answer rather than an error.
    pub async fn propose_from_image(
        &self,
        image: ImageAttachment,
    ) -> Result<Proposal, DraftingError> {
        let catalog = self.catalog().await?;
        let prompt = image_prompt(&catalog);
        let lines = self
            .extract(StructuredRequest::new(prompt, transaction_schema(&catalog)).with_image(image))
            .await?;
        Ok(Self::proposal(lines, &catalog))
    }

    /// Merges a free-text correction into an existing set of lines.
    ///
    /// # Errors
    ///
    /// `EditDroppedLines` when the provider returns fewer lines than it was
    /// given, since the merge policy never removes a line.
    pub async fn reconcile_edit(
        &self,
        existing_lines: &[TransactionLine],
        free_text: &str,
    ) -> Result<Proposal, DraftingError> {
        let catalog = self.catalog().await?;
        let prompt = edit_prompt(existing_lines, free_text, &catalog)
            .map_err(|e| DraftingError::infrastructure(format!("Failed to encode draft: {}", e)))?;
        let lines = self
            .extract(StructuredRequest::new(prompt, transaction_schema(&catalog)))
            .await?;

        if lines.len() < existing_lines.len() {
            warn!(
                existing = existing_lines.len(),
                returned = lines.len(),
                "Edit merge dropped lines"
            );
            return Err(DraftingError::EditDroppedLines {
                existing: existing_lines.len(),
                returned: lines.len(),
            });
        }

        Ok(Self::proposal(lines, &catalog))
    }

    /// Proposes lines through the unconstrained completion call.
    ///
    /// The schema travels inside the prompt text instead of as a provider
    /// contract, so the output leans harder on response cleaning.
    pub async fn propose_from_text_freeform(
        &self,
        free_text: &str,
    ) -> Result<Proposal, DraftingError> {
        let catalog = self.catalog().await?;
        let schema = transaction_schema(&catalog);
        let prompt = format!(
            "{}\n\nRespond with a single JSON object matching this schema and nothing else:\n{}",
            text_prompt(free_text, &catalog),
            schema
        );

        let started = Instant::now();
        let text = self.provider.complete_freeform(&prompt).await?;
        let completion = StructuredCompletion {
            text,
            tokens_used: 0,
            elapsed_ms: started.elapsed().as_millis() as u64,
            model: self.provider.model_name(),
        };
        self.log_exchange(&prompt, &completion).await;

        let lines = parse_lines(&completion.text)?;
        Ok(Self::proposal(lines, &catalog))
    }

    async fn catalog(&self) -> Result<Vec<Category>, DraftingError> {
        self.categories
            .list_all()
            .await
            .map_err(|e| DraftingError::CategoryResolution(e.to_string()))
    }

    async fn extract(&self, request: StructuredRequest) -> Result<Vec<TransactionLine>, DraftingError> {
        let prompt = request.prompt.clone();
        let completion = self.provider.complete_structured(request).await?;

        debug!(
            model = %completion.model,
            tokens_used = completion.tokens_used,
            elapsed_ms = completion.elapsed_ms,
            "Extraction completed"
        );
        self.log_exchange(&prompt, &completion).await;

        parse_lines(&completion.text).map_err(|e| {
            warn!(error = %e, response = %completion.text, "Failed to parse extraction output");
            DraftingError::from(e)
        })
    }

    /// Best-effort audit write; a failing log never fails the request.
    async fn log_exchange(&self, prompt: &str, completion: &StructuredCompletion) {
        let entry = PromptLogEntry {
            model: completion.model.clone(),
            prompt: prompt.to_string(),
            response: completion.text.clone(),
            tokens_used: completion.tokens_used,
            elapsed_ms: completion.elapsed_ms,
            logged_at: Timestamp::now(),
        };
        if let Err(e) = self.prompt_log.record(entry).await {
            warn!(error = %e, "Failed to record prompt log");
        }
    }

    fn proposal(lines: Vec<TransactionLine>, catalog: &[Category]) -> Proposal {
        let summary = render_summary(&lines, catalog);
        Proposal { lines, summary }
    }
}
