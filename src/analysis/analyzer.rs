use super::parser::parse_completion;
use super::prompt::{compose_prompt, ANALYSIS_SYSTEM_PROMPT};
use super::transport::OpenRouterTransport;
use super::types::{ChatCompletionRequest, ChatMessage, ChatTransport};
use super::AnalysisError;
use crate::config::AnalysisConfig;
use crate::models::{AnalysisResult, MedicalHistoryEntry, Medication, PatientProfile};
use crate::store::RecordStore;

/// Sends a composed prompt to the configured model and turns the reply
/// into an [`AnalysisResult`].
pub struct SymptomAnalyzer<T: ChatTransport> {
    config: AnalysisConfig,
    transport: T,
}

impl SymptomAnalyzer<OpenRouterTransport> {
    pub fn from_config(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let transport = OpenRouterTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: ChatTransport> SymptomAnalyzer<T> {
    pub fn new(config: AnalysisConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_credential(&self) -> bool {
        self.config.has_credential()
    }

    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stream: false,
        }
    }

    /// Analyze, surfacing the failure reason instead of falling back.
    pub fn try_analyze(
        &self,
        profile: &PatientProfile,
        history: &[MedicalHistoryEntry],
        medications: &[Medication],
    ) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AnalysisError::MissingCredential)?;

        let prompt = compose_prompt(profile, history, medications);
        let request = self.build_request(&prompt);

        tracing::debug!(
            model = %self.config.model,
            symptoms = profile.symptoms.len(),
            history = history.len(),
            medications = medications.len(),
            "Sending analysis request"
        );

        let body = self.transport.complete(api_key, &request)?;
        parse_completion(&body)
    }

    /// Analyze the given records. Never fails: any error (missing credential
    /// included) is logged and the fixed fallback result is returned.
    pub fn analyze(
        &self,
        profile: &PatientProfile,
        history: &[MedicalHistoryEntry],
        medications: &[Medication],
    ) -> AnalysisResult {
        match self.try_analyze(profile, history, medications) {
            Ok(result) => {
                tracing::info!(
                    kind = %result.kind,
                    urgency = result.urgency_level.as_deref().unwrap_or("unspecified"),
                    "Analysis complete"
                );
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed, returning fallback result");
                AnalysisResult::fallback()
            }
        }
    }

    /// [`Self::analyze`] over a whole record store.
    pub fn analyze_records(&self, records: &RecordStore) -> AnalysisResult {
        self.analyze(
            &records.profile,
            records.history.list(),
            records.medications.list(),
        )
    }
}
