use serde::{Deserialize, Serialize};

/// A chronic condition shown as a pill in the medical history card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    /// Style key, e.g. "diabetes".
    pub category: String,
    pub icon: String,
}

/// A row of the current treatments table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub drug: String,
    pub dosage: String,
    pub duration: String,
    pub doctor: String,
}

/// Static demographics and summary data for the patient on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub blood_group: String,
    pub worker_id: String,
    pub occupation: String,
    pub allergies: Vec<String>,
    pub emergency_contact: String,
    pub medical_history: Vec<Condition>,
    pub treatments: Vec<Treatment>,
}

impl PatientProfile {
    /// The hardcoded demo patient.
    pub fn demo() -> Self {
        let condition = |name: &str, category: &str, icon: &str| Condition {
            name: name.into(),
            category: category.into(),
            icon: icon.into(),
        };
        let treatment = |drug: &str, dosage: &str, duration: &str, doctor: &str| Treatment {
            drug: drug.into(),
            dosage: dosage.into(),
            duration: duration.into(),
            doctor: doctor.into(),
        };

        Self {
            name: "Rajesh Kumar".into(),
            age: 31,
            gender: "Male".into(),
            blood_group: "O+".into(),
            worker_id: "KL-MW-2024-1234".into(),
            occupation: "Construction Worker".into(),
            allergies: vec!["Penicillin".into()],
            emergency_contact: "+91-98765 43210".into(),
            medical_history: vec![
                condition("Diabetes", "diabetes", "💙"),
                condition("Tuberculosis", "tuberculosis", "🫁"),
                condition("Hypertension", "hypertension", "💓"),
            ],
            treatments: vec![
                treatment("Metformin", "500mg", "3 months", "Dr. Sharma"),
                treatment("Amlodipine", "5mg", "6 months", "Dr. Patel"),
                treatment("Insulin", "10 units", "Ongoing", "Dr. Kumar"),
            ],
        }
    }

    /// "31 years, Male"
    pub fn age_gender(&self) -> String {
        format!("{} years, {}", self.age, self.gender)
    }

    /// Allergies joined for the emergency bar, "None" when empty.
    pub fn allergy_summary(&self) -> String {
        if self.allergies.is_empty() {
            "None".to_string()
        } else {
            self.allergies.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_patient_summary() {
        let patient = PatientProfile::demo();
        assert_eq!(patient.name, "Rajesh Kumar");
        assert_eq!(patient.age_gender(), "31 years, Male");
        assert_eq!(patient.allergy_summary(), "Penicillin");
        assert_eq!(patient.medical_history.len(), 3);
        assert_eq!(patient.treatments[0].drug, "Metformin");
    }

    #[test]
    fn allergy_summary_when_none() {
        let mut patient = PatientProfile::demo();
        patient.allergies.clear();
        assert_eq!(patient.allergy_summary(), "None");
    }
}
