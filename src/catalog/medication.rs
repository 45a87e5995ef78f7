//! Static medication content: schedule options, presets and display colors.

use super::choice;
use crate::content::OptionDefinition;

/// Colors assigned to medications in the order they are added.
pub const PALETTE: [&str; 8] = [
    "#4ECDC4", "#FF6B6B", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
];

pub const DOSAGE_PRESETS_MG: [u32; 9] = [25, 50, 100, 150, 200, 250, 300, 400, 500];
pub const QUANTITY_PRESETS: [u32; 4] = [1, 2, 3, 4];

/// Commonly prescribed Parkinson's medications and their drug class, used for
/// name suggestions.
pub const POPULAR_MEDICATIONS: [(&str, &str); 12] = [
    ("Levodopa", "Dopamine Precursor"),
    ("Carbidopa", "Decarboxylase Inhibitor"),
    ("Pramipexole", "Dopamine Agonist"),
    ("Ropinirole", "Dopamine Agonist"),
    ("Rotigotine", "Dopamine Agonist"),
    ("Apomorphine", "Dopamine Agonist"),
    ("Rasagiline", "MAO-B Inhibitor"),
    ("Selegiline", "MAO-B Inhibitor"),
    ("Safinamide", "MAO-B Inhibitor"),
    ("Entacapone", "COMT Inhibitor"),
    ("Opicapone", "COMT Inhibitor"),
    ("Amantadine", "Antiviral/Antiparkinsonian"),
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Popular names starting with `prefix`, case-insensitively.
pub fn suggest(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    POPULAR_MEDICATIONS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect()
}

pub fn frequency_options() -> Vec<OptionDefinition> {
    vec![
        choice("once", "Once daily", "1️⃣"),
        choice("twice", "Twice daily", "2️⃣"),
        choice("three", "Three times", "3️⃣"),
        choice("four", "Four times", "4️⃣"),
        choice("as_needed", "As needed", "🔄"),
    ]
}

pub fn time_options() -> Vec<OptionDefinition> {
    vec![
        choice("morning", "Morning", "🌅"),
        choice("afternoon", "Afternoon", "☀️"),
        choice("evening", "Evening", "🌆"),
        choice("night", "Night", "🌙"),
    ]
}

pub fn type_options() -> Vec<OptionDefinition> {
    vec![
        choice("tablet", "Tablet", "💊"),
        choice("capsule", "Capsule", "💠"),
        choice("patch", "Patch", "🩹"),
        choice("injection", "Injection", "💉"),
        choice("liquid", "Liquid", "🧴"),
    ]
}
