use serde::{Deserialize, Serialize};

/// Identifier of the exclusive "no symptoms" option every category carries.
pub const NO_SYMPTOMS: &str = "none";

/// Identifier of the "Other" option every diary appends; picking it asks for a
/// short description.
pub const OTHER_SYMPTOM: &str = "other";

/// 0-4 frequency scale shared by all diaries.
pub const FREQUENCY_SCALE: [(u8, &str); 5] = [
    (0, "Never"),
    (1, "Occasionally"),
    (2, "Sometimes"),
    (3, "Often"),
    (4, "Always"),
];

/// 0-4 impact scale shared by all diaries.
pub const IMPACT_SCALE: [(u8, &str); 5] = [
    (0, "None"),
    (1, "Mild"),
    (2, "Medium"),
    (3, "High"),
    (4, "Very high"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarySymptom {
    pub id: String,
    pub label: String,
}

/// One symptom diary: its symptom list and the optional extras that shape
/// the flow built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryCategory {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub tag: String,
    pub symptoms: Vec<DiarySymptom>,
    /// Present when the category asks when symptoms are worst.
    #[serde(default)]
    pub worst_time_options: Vec<String>,
    /// Symptoms that raise a safety notice after the impact question.
    #[serde(default)]
    pub safety_triggers: Vec<String>,
    #[serde(default)]
    pub safety_message: Option<String>,
}

impl DiaryCategory {
    fn new(id: &str, title: &str, icon: &str, description: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            tag: tag.to_string(),
            symptoms: vec![DiarySymptom {
                id: NO_SYMPTOMS.to_string(),
                label: "No symptoms experienced".to_string(),
            }],
            worst_time_options: Vec::new(),
            safety_triggers: Vec::new(),
            safety_message: None,
        }
    }

    fn symptoms(mut self, symptoms: &[(&str, &str)]) -> Self {
        self.symptoms.extend(symptoms.iter().map(|(id, label)| DiarySymptom {
            id: id.to_string(),
            label: label.to_string(),
        }));
        self
    }

    fn worst_times(mut self, times: &[&str]) -> Self {
        self.worst_time_options = times.iter().map(|t| t.to_string()).collect();
        self
    }

    fn safety(mut self, triggers: &[&str], message: &str) -> Self {
        self.safety_triggers = triggers.iter().map(|t| t.to_string()).collect();
        self.safety_message = Some(message.to_string());
        self
    }

    pub fn has_worst_time(&self) -> bool {
        !self.worst_time_options.is_empty()
    }

    /// A safety notice needs both triggers and a message to show.
    pub fn has_safety_notice(&self) -> bool {
        !self.safety_triggers.is_empty() && self.safety_message.is_some()
    }

    pub fn symptom(&self, id: &str) -> Option<&DiarySymptom> {
        self.symptoms.iter().find(|s| s.id == id)
    }
}

/// Looks up a built-in category by identifier.
pub fn category(id: &str) -> Option<DiaryCategory> {
    categories().into_iter().find(|c| c.id == id)
}

/// All built-in diary categories, in display order.
pub fn categories() -> Vec<DiaryCategory> {
    vec![
        DiaryCategory::new(
            "sleep",
            "Sleep",
            "😴",
            "Track sleep and daytime energy in 60 seconds.",
            "sleep",
        )
        .symptoms(&[
            ("restless", "I have restless sleep"),
            ("falling_asleep", "I have difficulty falling asleep at night"),
            ("staying_asleep", "I have difficulty staying asleep"),
            ("back_to_sleep", "I have difficulty getting back to sleep once awake"),
            ("morning_tiredness", "I have morning tiredness"),
            ("fatigue", "I have fatigue during the day"),
            ("doze_off", "I frequently doze off at inappropriate moments"),
        ])
        .worst_times(&["Bedtime", "Night", "Early morning", "Daytime", "Random"]),
        DiaryCategory::new(
            "attention_memory",
            "Attention & Memory",
            "🧠",
            "Quick check-in on attention and memory.",
            "cognition",
        )
        .symptoms(&[
            ("train_of_thought", "I lose my train of thought during conversations"),
            ("concentrate", "I am unable to concentrate during activities"),
            ("slowness_speech", "I have slowness of speech"),
            ("forgetful", "I am forgetful"),
            ("remembering", "I have difficulty remembering names, numbers, events"),
        ]),
        DiaryCategory::new(
            "digestion",
            "Digestion & Gut",
            "🥗",
            "Track swallowing, nausea, and bowel changes.",
            "gut",
        )
        .symptoms(&[
            ("swallowing", "I have difficulty swallowing"),
            ("drooling", "I am dribbling/drooling (a lot of saliva)"),
            ("nausea", "I have bouts of vomiting or feeling sick (nausea)"),
            ("constipation", "I have constipation"),
            ("diarrhoea", "I have diarrhoea"),
            ("upset_stomach", "I have an upset stomach"),
        ])
        .safety(
            &["swallowing", "nausea"],
            "If swallowing or vomiting is new or worsening, tell your clinician.",
        ),
        DiaryCategory::new(
            "movement",
            "Movement",
            "🏃",
            "Track tremor, stiffness, freezing, balance.",
            "movement",
        )
        .symptoms(&[
            ("freezing", "My feet feel stuck to the floor / I have trouble starting to move"),
            (
                "morning_stiffness",
                "My movements feel stiff (Rigidity) predominantly in the early morning after waking-up",
            ),
            ("stiffness_day", "I have stiffness (Rigidity) throughout the day"),
            ("tremor", "I have shaking (Tremor)"),
            ("bradykinesia", "I have slowness of movement (Bradykinesia)"),
            ("decreased_movement", "I have decreased ability to move at some times during the day"),
            ("dyskinesias", "I have involuntary movements (Dyskinesias)"),
            ("balance", "I lose my balance"),
            ("falls", "I fall over"),
            ("leaning", "I lean towards or to the side"),
            ("talking", "I have trouble talking"),
            ("micrographia", "I have small handwriting (Micrographia)"),
        ])
        .worst_times(&["Morning", "Mid-day", "Evening", "Night", "Random"])
        .safety(
            &["falls", "balance"],
            "Falls risk flagged. Track where/when it happened. Ask about balance/PT and home safety.",
        ),
        DiaryCategory::new(
            "pain",
            "Pain",
            "🩹",
            "Track cramps, stiffness pain, headaches.",
            "pain",
        )
        .symptoms(&[
            (
                "dystonia",
                "I have early morning painful cramps (dystonia) affecting toes, fingers ankles, wrists causing me to wake up",
            ),
            ("stiff_day", "I have painful, stiff limbs during the day"),
            ("stiff_night", "I have painful, stiff limbs at night"),
            ("shooting_pain", "I have shock-like shooting pain down my limbs"),
            ("dyskinesia_pain", "I have pain with abnormal involuntary movements (Dyskinesia)"),
            ("headaches", "I have severe headaches"),
        ]),
        DiaryCategory::new(
            "bladder",
            "Bladder & Sexual",
            "💧",
            "Track urgency, nighttime urination, sexual changes.",
            "bladder",
        )
        .symptoms(&[
            ("urge", "I feel the urge to pass urine"),
            ("night_urination", "I get up at night to pass urine"),
            ("interest_sex", "I have an altered interest in sex"),
            ("difficulty_sex", "I have difficulty having sex"),
        ]),
        DiaryCategory::new(
            "nonmotor",
            "Other Non-Motor",
            "📋",
            "Quick check-in on dizziness, sweating, smell, hallucinations.",
            "nms",
        )
        .symptoms(&[
            ("dizzy", "I feel light-headed/dizzy when standing from a lying position"),
            ("fainting", "I fall due to fainting/blackouts"),
            ("smell_taste", "I notice a change in my ability to smell/taste"),
            ("weight", "I notice a change in weight (not due to change in diet)"),
            ("sweating", "I have excessive sweating"),
            ("hallucinations", "I see/hear things that are not there"),
        ])
        .safety(
            &["hallucinations"],
            "Hallucinations flagged. Tell your clinician promptly. Medication changes may help.",
        ),
        DiaryCategory::new(
            "mood",
            "Mood",
            "💭",
            "Track low mood, anxiety, loss of interest.",
            "mood",
        )
        .symptoms(&[
            ("loss_interest", "I feel a loss of interest"),
            ("lack_pleasure", "I lack pleasure from things I used to enjoy"),
            ("unhappy", "I feel unhappy"),
            ("anxious", "I am anxious, frightened or panicky"),
            ("depressed", "I am depressed"),
        ]),
    ]
}
