//! Recommended follow-up actions per diagnosis

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CareAction {
    pub title: &'static str,
    pub description: &'static str,
}

const fn action(title: &'static str, description: &'static str) -> CareAction {
    CareAction { title, description }
}

const TOMATO_EARLY_BLIGHT: &[CareAction] = &[
    action("Leaf Removal", "Remove and burn infected leaves to stop spreading."),
    action("Copper Spray", "Apply copper fungicide every 7 days."),
];

const TOMATO_LATE_BLIGHT: &[CareAction] = &[
    action("Mancozeb Treatment", "Spray mancozeb 0.25% solution immediately."),
    action("Irrigation Control", "Avoid overhead watering and excess moisture."),
];

const POTATO_EARLY_BLIGHT: &[CareAction] = &[
    action("Crop Rotation", "Do not plant potato for next season in same soil."),
    action("Chlorothalonil", "Use chlorothalonil based fungicide."),
];

const POTATO_LATE_BLIGHT: &[CareAction] = &[
    action("Destroy Residue", "Destroy previous crop debris completely."),
    action("Resistant Variety", "Use certified resistant seeds next time."),
];

const HEALTHY: &[CareAction] = &[action(
    "No Action Needed",
    "Leaf looks healthy. Maintain nutrition and monitoring.",
)];

const UNKNOWN_DISEASE: &[CareAction] = &[action(
    "Consult an Expert",
    "Consult with agricultural experts for proper treatment and management strategies.",
)];

/// Actions for a diagnosis label; unknown labels get a generic referral
pub fn actions_for(label: &str) -> &'static [CareAction] {
    match label {
        "Tomato Early Blight" => TOMATO_EARLY_BLIGHT,
        "Tomato Late Blight" => TOMATO_LATE_BLIGHT,
        "Potato Early Blight" => POTATO_EARLY_BLIGHT,
        "Potato Late Blight" => POTATO_LATE_BLIGHT,
        crate::api::HEALTHY_LABEL => HEALTHY,
        _ => UNKNOWN_DISEASE,
    }
}
