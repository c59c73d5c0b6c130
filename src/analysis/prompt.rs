use chrono::SecondsFormat;

use crate::models::{MedicalHistoryEntry, Medication, PatientProfile, Symptom};

pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert medical AI assistant specializing in symptom analysis.

CRITICAL INSTRUCTIONS:
- Respond ONLY with valid JSON - no markdown, no explanations, no extra text
- Be precise and medically accurate
- Focus on the most likely conditions based on symptoms
- Prioritize patient safety in recommendations
- Use clinical reasoning patterns

Response format (JSON only):
{
 "type": "urgent|monitor|routine",
 "message": "concise clinical assessment",
 "recommendations": ["specific actionable advice", "..."],
 "possibleConditions": ["most likely conditions", "..."],
 "urgencyLevel": "low|medium|high",
 "disclaimer": "standard medical disclaimer"
}"#;

pub const NO_SYMPTOMS: &str = "No symptoms reported";
pub const NO_HISTORY: &str = "No significant medical history reported";
pub const NO_MEDICATIONS: &str = "No current medications reported";

const ANALYSIS_FOOTER: &str = r#"ANALYSIS REQUIREMENTS:
- Assess urgency level based on symptom severity and combination
- Provide 3-5 specific, actionable recommendations
- List 2-4 most likely conditions based on symptoms
- Consider patient's age and gender in assessment
- Prioritize patient safety

Respond with ONLY a JSON object in this exact format:
{
  "type": "urgent" | "monitor" | "routine",
  "message": "Brief assessment message",
  "recommendations": ["recommendation 1", "recommendation 2", "recommendation 3"],
  "possibleConditions": ["condition 1", "condition 2"],
  "urgencyLevel": "low" | "medium" | "high",
  "disclaimer": "This analysis is for informational purposes only and does not replace professional medical advice."
}"#;

/// Build the user prompt from a snapshot of the patient's records.
///
/// Pure: the same records always give byte-identical text. Each block
/// follows collection order.
pub fn compose_prompt(
    profile: &PatientProfile,
    history: &[MedicalHistoryEntry],
    medications: &[Medication],
) -> String {
    let symptoms = render_block(profile.symptoms.list(), render_symptom, NO_SYMPTOMS);
    let history = render_block(history, render_history, NO_HISTORY);
    let medications = render_block(medications, render_medication, NO_MEDICATIONS);

    format!(
        r#"Analyze these patient symptoms and provide a medical assessment.

PATIENT DATA:
- Age: {age} years
- Gender: {gender}

SYMPTOMS:
{symptoms}

MEDICAL HISTORY:
{history}

CURRENT MEDICATIONS:
{medications}

{ANALYSIS_FOOTER}
"#,
        age = profile.age,
        gender = profile.gender,
    )
}

fn render_block<T>(items: &[T], render: fn(&T) -> String, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

/// Optional text worth printing; blank counts as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn render_symptom(s: &Symptom) -> String {
    let location = match s.location.trim() {
        "" => "Not specified",
        l => l,
    };
    format!(
        "- {} (Severity: {}/10, Duration: {} hours, Location: {})",
        s.description, s.severity, s.duration_hours, location
    )
}

fn render_history(h: &MedicalHistoryEntry) -> String {
    let date = h
        .diagnosis_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let mut line = format!(
        "- {} ({}) | Status: {}, Severity: {}",
        h.condition, date, h.status, h.severity
    );
    if let Some(treatment) = present(&h.treatment) {
        line.push_str(&format!(", Treatment: {treatment}"));
    }
    if let Some(notes) = present(&h.notes) {
        line.push_str(&format!(", Notes: {notes}"));
    }
    if let Some(related) = h.related_symptoms.as_ref().filter(|r| !r.is_empty()) {
        line.push_str(&format!(", Related Symptoms: {}", related.join(", ")));
    }
    line
}

fn render_medication(m: &Medication) -> String {
    let times = if m.times.is_empty() {
        "N/A".to_string()
    } else {
        m.times.join(", ")
    };
    let mut line = format!(
        "- {} {} ({}) | Times: {}, Start: {}",
        m.name,
        m.dosage,
        m.frequency,
        times,
        m.start_date.format("%Y-%m-%d")
    );
    if let Some(end) = m.end_date {
        line.push_str(&format!(", End: {}", end.format("%Y-%m-%d")));
    }
    if let Some(notes) = present(&m.notes) {
        line.push_str(&format!(", Notes: {notes}"));
    }
    line.push_str(&format!(
        ", Active: {}, Reminder: {}",
        if m.is_active { "Yes" } else { "No" },
        if m.reminder_enabled { "On" } else { "Off" }
    ));
    if let Some(taken) = m.last_taken {
        line.push_str(&format!(
            ", Last Taken: {}",
            taken.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
    }
    line
}
