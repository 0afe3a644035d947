//! Create forms and their local validation

use thiserror::Error;

use crate::messages::ui_events::FormField;
use crate::models::{AppointmentCreate, DoctorCreate, Patient, PatientCreate};

/// Local validation failure, raised before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all required fields")]
    MissingFields,
    #[error("Please select a patient and schedule time")]
    MissingPatientOrTime,
}

/// Non-numeric or negative input counts as no age at all
fn parse_age(text: &str) -> i64 {
    text.trim().parse::<i64>().ok().filter(|age| *age > 0).unwrap_or(0)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoctorForm {
    pub name: String,
    pub age: String,
    pub specialty: String,
    pub contact: String,
}

impl DoctorForm {
    pub fn to_input(&self) -> Result<DoctorCreate, ValidationError> {
        let name = self.name.trim();
        let specialty = self.specialty.trim();
        let contact = self.contact.trim();
        if name.is_empty() || specialty.is_empty() || contact.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(DoctorCreate {
            name: name.to_string(),
            age: parse_age(&self.age),
            specialty: specialty.to_string(),
            contact: contact.to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub symptoms: String,
}

impl PatientForm {
    pub fn to_input(&self) -> Result<PatientCreate, ValidationError> {
        let name = self.name.trim();
        let age = parse_age(&self.age);
        if name.is_empty() || age == 0 {
            return Err(ValidationError::MissingFields);
        }
        Ok(PatientCreate {
            name: name.to_string(),
            age,
            symptoms: self.symptoms.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppointmentForm {
    /// Chosen from the loaded patients; empty means none chosen
    pub patient_name: String,
    pub symptoms: String,
    pub scheduled_time: String,
}

impl AppointmentForm {
    pub fn to_input(&self) -> Result<AppointmentCreate, ValidationError> {
        let scheduled_time = self.scheduled_time.trim();
        if self.patient_name.is_empty() || scheduled_time.is_empty() {
            return Err(ValidationError::MissingPatientOrTime);
        }
        Ok(AppointmentCreate {
            patient_name: self.patient_name.clone(),
            symptoms: self.symptoms.trim().to_string(),
            scheduled_time: scheduled_time.to_string(),
        })
    }

    /// Step the patient picker through `patients`, wrapping around
    pub fn cycle_patient(&mut self, patients: &[Patient], forward: bool) {
        if patients.is_empty() {
            self.patient_name.clear();
            return;
        }
        let len = patients.len();
        let current = patients.iter().position(|p| p.name == self.patient_name);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.patient_name = patients[next].name.clone();
        if self.symptoms.is_empty() {
            if let Some(symptoms) = &patients[next].symptoms {
                self.symptoms = symptoms.clone();
            }
        }
    }
}

/// The three create forms of the Create tab
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateForms {
    pub doctor: DoctorForm,
    pub patient: PatientForm,
    pub appointment: AppointmentForm,
}

impl CreateForms {
    /// Text buffer behind a typed field; the patient picker has none
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::DoctorName => Some(&mut self.doctor.name),
            FormField::DoctorAge => Some(&mut self.doctor.age),
            FormField::DoctorSpecialty => Some(&mut self.doctor.specialty),
            FormField::DoctorContact => Some(&mut self.doctor.contact),
            FormField::PatientName => Some(&mut self.patient.name),
            FormField::PatientAge => Some(&mut self.patient.age),
            FormField::PatientSymptoms => Some(&mut self.patient.symptoms),
            FormField::AppointmentPatient => None,
            FormField::AppointmentSymptoms => Some(&mut self.appointment.symptoms),
            FormField::AppointmentTime => Some(&mut self.appointment.scheduled_time),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::DoctorName => &self.doctor.name,
            FormField::DoctorAge => &self.doctor.age,
            FormField::DoctorSpecialty => &self.doctor.specialty,
            FormField::DoctorContact => &self.doctor.contact,
            FormField::PatientName => &self.patient.name,
            FormField::PatientAge => &self.patient.age,
            FormField::PatientSymptoms => &self.patient.symptoms,
            FormField::AppointmentPatient => &self.appointment.patient_name,
            FormField::AppointmentSymptoms => &self.appointment.symptoms,
            FormField::AppointmentTime => &self.appointment.scheduled_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64, name: &str, symptoms: Option<&str>) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            age: 30,
            symptoms: symptoms.map(String::from),
        }
    }

    #[test]
    fn test_doctor_requires_name_specialty_contact() {
        let mut form = DoctorForm {
            name: "Dr. A".into(),
            age: "40".into(),
            specialty: "Cardiology".into(),
            contact: "   ".into(),
        };
        assert_eq!(form.to_input(), Err(ValidationError::MissingFields));
        form.contact = "a@x.com".into();

        for blank in 0..3 {
            let mut missing = form.clone();
            match blank {
                0 => missing.name.clear(),
                1 => missing.specialty = " ".into(),
                _ => missing.contact.clear(),
            }
            assert_eq!(missing.to_input(), Err(ValidationError::MissingFields), "blank field {}", blank);
        }

        let input = form.to_input().unwrap();
        assert_eq!(input.age, 40);
        assert_eq!(input.contact, "a@x.com");
    }

    #[test]
    fn test_doctor_age_is_optional() {
        let form = DoctorForm {
            name: "Dr. A".into(),
            age: String::new(),
            specialty: "Cardiology".into(),
            contact: "a@x.com".into(),
        };
        assert_eq!(form.to_input().unwrap().age, 0);
    }

    #[test]
    fn test_patient_age_must_be_positive() {
        for age in ["", "0", "-3", "abc"] {
            let form = PatientForm {
                name: "Bob".into(),
                age: age.into(),
                symptoms: String::new(),
            };
            assert_eq!(form.to_input(), Err(ValidationError::MissingFields), "age {:?}", age);
        }
    }

    #[test]
    fn test_appointment_requires_patient_and_time() {
        let mut form = AppointmentForm {
            patient_name: String::new(),
            symptoms: "cough".into(),
            scheduled_time: "2024-01-15T10:30".into(),
        };
        let err = form.to_input().unwrap_err();
        assert_eq!(err.to_string(), "Please select a patient and schedule time");

        form.patient_name = "Bob".into();
        form.scheduled_time.clear();
        assert_eq!(form.to_input(), Err(ValidationError::MissingPatientOrTime));
    }

    #[test]
    fn test_cycle_patient_wraps_and_prefills_symptoms() {
        let patients = vec![patient(1, "Alice", Some("fever")), patient(2, "Bob", None)];
        let mut form = AppointmentForm::default();

        form.cycle_patient(&patients, true);
        assert_eq!(form.patient_name, "Alice");
        assert_eq!(form.symptoms, "fever");

        form.cycle_patient(&patients, true);
        assert_eq!(form.patient_name, "Bob");
        assert_eq!(form.symptoms, "fever");

        form.cycle_patient(&patients, true);
        assert_eq!(form.patient_name, "Alice");

        form.cycle_patient(&patients, false);
        assert_eq!(form.patient_name, "Bob");
    }

    #[test]
    fn test_picker_has_no_text_buffer() {
        let mut forms = CreateForms::default();
        assert!(forms.field_mut(FormField::AppointmentPatient).is_none());
        forms.field_mut(FormField::PatientName).unwrap().push('Z');
        assert_eq!(forms.field(FormField::PatientName), "Z");
    }
}
