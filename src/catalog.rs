//! Symptom picker reference data.
//!
//! A fixed catalog of common symptoms used to pre-fill new entries and
//! to power search/filter. Nothing here is user data.

use crate::models::{PatientProfile, SymptomTemplate};

// ═══════════════════════════════════════════
// Categories and templates
// ═══════════════════════════════════════════

pub const CATEGORIES: &[&str] = &[
    "General",
    "Head & Neck",
    "Respiratory",
    "Cardiovascular",
    "Gastrointestinal",
    "Musculoskeletal",
    "Neurological",
    "Skin",
    "Urinary",
    "Mental Health",
];

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

const fn tpl(
    id: &'static str,
    name: &'static str,
    category: &'static str,
    common_locations: &'static [&'static str],
    description: &'static str,
) -> SymptomTemplate {
    SymptomTemplate {
        id,
        name,
        category,
        common_locations,
        description,
    }
}

static TEMPLATES: &[SymptomTemplate] = &[
    // General
    tpl(
        "fever",
        "Fever",
        "General",
        &["Whole body"],
        "Elevated body temperature above normal range",
    ),
    tpl(
        "fatigue",
        "Fatigue",
        "General",
        &["Whole body"],
        "Extreme tiredness or lack of energy",
    ),
    tpl(
        "chills",
        "Chills",
        "General",
        &["Whole body"],
        "Feeling cold with shivering",
    ),
    tpl(
        "sweating",
        "Excessive Sweating",
        "General",
        &["Whole body", "Palms", "Forehead"],
        "Abnormal or excessive perspiration",
    ),
    // Head & Neck
    tpl(
        "headache",
        "Headache",
        "Head & Neck",
        &[
            "Forehead",
            "Temples",
            "Back of head",
            "Top of head",
            "Whole head",
        ],
        "Pain or discomfort in the head or neck area",
    ),
    tpl(
        "sore_throat",
        "Sore Throat",
        "Head & Neck",
        &["Throat", "Tonsils"],
        "Pain or irritation in the throat",
    ),
    tpl(
        "neck_pain",
        "Neck Pain",
        "Head & Neck",
        &["Front of neck", "Back of neck", "Side of neck"],
        "Pain or stiffness in the neck area",
    ),
    tpl(
        "earache",
        "Earache",
        "Head & Neck",
        &["Left ear", "Right ear", "Both ears"],
        "Pain or discomfort in the ear",
    ),
    // Respiratory
    tpl(
        "cough",
        "Cough",
        "Respiratory",
        &["Chest", "Throat"],
        "Persistent coughing or throat clearing",
    ),
    tpl(
        "shortness_breath",
        "Shortness of Breath",
        "Respiratory",
        &["Chest", "Lungs"],
        "Difficulty breathing or feeling breathless",
    ),
    tpl(
        "chest_congestion",
        "Chest Congestion",
        "Respiratory",
        &["Chest", "Upper chest", "Lower chest"],
        "Feeling of fullness or tightness in the chest",
    ),
    tpl(
        "wheezing",
        "Wheezing",
        "Respiratory",
        &["Chest", "Airways"],
        "High-pitched whistling sound when breathing",
    ),
    // Cardiovascular
    tpl(
        "chest_pain",
        "Chest Pain",
        "Cardiovascular",
        &[
            "Center of chest",
            "Left chest",
            "Right chest",
            "Upper chest",
        ],
        "Pain or discomfort in the chest area",
    ),
    tpl(
        "palpitations",
        "Heart Palpitations",
        "Cardiovascular",
        &["Chest", "Heart area"],
        "Feeling of rapid, fluttering, or pounding heartbeat",
    ),
    tpl(
        "dizziness",
        "Dizziness",
        "Cardiovascular",
        &["Head"],
        "Feeling lightheaded or unsteady",
    ),
    // Gastrointestinal
    tpl(
        "nausea",
        "Nausea",
        "Gastrointestinal",
        &["Stomach", "Upper abdomen"],
        "Feeling of sickness with urge to vomit",
    ),
    tpl(
        "vomiting",
        "Vomiting",
        "Gastrointestinal",
        &["Stomach"],
        "Forceful expulsion of stomach contents",
    ),
    tpl(
        "abdominal_pain",
        "Abdominal Pain",
        "Gastrointestinal",
        &[
            "Upper abdomen",
            "Lower abdomen",
            "Left side",
            "Right side",
            "Center",
        ],
        "Pain or discomfort in the stomach area",
    ),
    tpl(
        "diarrhea",
        "Diarrhea",
        "Gastrointestinal",
        &["Intestines", "Lower abdomen"],
        "Loose or watery bowel movements",
    ),
    tpl(
        "constipation",
        "Constipation",
        "Gastrointestinal",
        &["Lower abdomen", "Intestines"],
        "Difficulty or infrequent bowel movements",
    ),
    // Musculoskeletal
    tpl(
        "back_pain",
        "Back Pain",
        "Musculoskeletal",
        &["Lower back", "Upper back", "Middle back", "Spine"],
        "Pain or discomfort in the back area",
    ),
    tpl(
        "joint_pain",
        "Joint Pain",
        "Musculoskeletal",
        &[
            "Knees",
            "Shoulders",
            "Hips",
            "Ankles",
            "Wrists",
            "Elbows",
        ],
        "Pain or stiffness in joints",
    ),
    tpl(
        "muscle_pain",
        "Muscle Pain",
        "Musculoskeletal",
        &["Arms", "Legs", "Back", "Shoulders", "Neck"],
        "Pain or soreness in muscles",
    ),
    // Neurological
    tpl(
        "confusion",
        "Confusion",
        "Neurological",
        &["Head", "Brain"],
        "Difficulty thinking clearly or concentrating",
    ),
    tpl(
        "numbness",
        "Numbness",
        "Neurological",
        &["Arms", "Legs", "Hands", "Feet", "Face"],
        "Loss of sensation or feeling",
    ),
    tpl(
        "tingling",
        "Tingling",
        "Neurological",
        &["Arms", "Legs", "Hands", "Feet"],
        "Pins and needles sensation",
    ),
    // Skin
    tpl(
        "rash",
        "Rash",
        "Skin",
        &["Arms", "Legs", "Torso", "Face", "Hands"],
        "Red, irritated, or inflamed skin",
    ),
    tpl(
        "itching",
        "Itching",
        "Skin",
        &["Arms", "Legs", "Torso", "Face", "Scalp"],
        "Persistent urge to scratch",
    ),
    // Urinary
    tpl(
        "frequent_urination",
        "Frequent Urination",
        "Urinary",
        &["Bladder", "Lower abdomen"],
        "Need to urinate more often than usual",
    ),
    tpl(
        "painful_urination",
        "Painful Urination",
        "Urinary",
        &["Bladder", "Urethra"],
        "Pain or burning sensation when urinating",
    ),
    // Mental Health
    tpl(
        "anxiety",
        "Anxiety",
        "Mental Health",
        &["Whole body", "Chest", "Head"],
        "Feelings of worry, nervousness, or unease",
    ),
    tpl(
        "depression",
        "Depression",
        "Mental Health",
        &["Whole body"],
        "Persistent feelings of sadness or loss of interest",
    ),
];

// ═══════════════════════════════════════════
// Lookup and search
// ═══════════════════════════════════════════

pub fn templates() -> &'static [SymptomTemplate] {
    TEMPLATES
}

pub fn find_by_id(id: &str) -> Option<&'static SymptomTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Case-insensitive exact match on the template name.
pub fn find_by_name(name: &str) -> Option<&'static SymptomTemplate> {
    let needle = name.trim().to_lowercase();
    TEMPLATES.iter().find(|t| t.name.to_lowercase() == needle)
}

/// Location suggestions for a symptom description; empty when the
/// description does not name a catalog symptom.
pub fn common_locations_for(description: &str) -> &'static [&'static str] {
    find_by_name(description)
        .map(|t| t.common_locations)
        .unwrap_or(&[])
}

/// Filter the catalog for the picker.
///
/// `term` matches name or description case-insensitively (empty matches
/// everything). `category` of `None` or `"All"` disables the category
/// filter. Templates whose id is in `exclude_ids` are skipped.
pub fn search(
    term: &str,
    category: Option<&str>,
    exclude_ids: &[&str],
) -> Vec<&'static SymptomTemplate> {
    let term = term.trim().to_lowercase();
    TEMPLATES
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&term) || t.description.to_lowercase().contains(&term)
        })
        .filter(|t| match category {
            None | Some(ALL_CATEGORIES) => true,
            Some(c) => t.category == c,
        })
        .filter(|t| !exclude_ids.contains(&t.id))
        .collect()
}

/// Group templates by category, categories in first-seen order.
pub fn group_by_category<'a>(
    templates: &[&'a SymptomTemplate],
) -> Vec<(&'static str, Vec<&'a SymptomTemplate>)> {
    let mut groups: Vec<(&'static str, Vec<&'a SymptomTemplate>)> = Vec::new();
    for template in templates {
        match groups.iter_mut().find(|(c, _)| *c == template.category) {
            Some((_, members)) => members.push(*template),
            None => groups.push((template.category, vec![*template])),
        }
    }
    groups
}

/// Ids of catalog templates already present in the profile's symptom list.
pub fn selected_template_ids(profile: &PatientProfile) -> Vec<&'static str> {
    profile
        .symptoms
        .iter()
        .filter_map(|s| find_by_name(&s.description))
        .map(|t| t.id)
        .collect()
}
