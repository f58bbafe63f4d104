use crate::types::{PatientProfile, ProviderProfile};

/// Build the caller-side agent script for one booking call. Pure string
/// construction: every profile field is interpolated verbatim and absent
/// optional fields render as a fixed placeholder, so this never fails.
pub fn build_agent_script(patient: &PatientProfile, dentist: &ProviderProfile) -> String {
    let relation = patient.relation.as_deref().unwrap_or("N/A");
    let special_notes = patient.special_notes.as_deref().unwrap_or("None");
    let preferred_dates = if patient.preferred_dates.is_empty() {
        "None".to_string()
    } else {
        patient.preferred_dates.join(", ")
    };

    format!(
        "\
You are an AI virtual assistant making a phone call to book a dental appointment on behalf of {patient_name}.

**Important Rules:**
1. **Role Clarification:**
- You are NOT the receptionist or dentist.
- You are an AI calling on behalf of the patient.
- Your goal is to speak to the **receptionist or dentist** and book an appointment.
- Wait for the receptionist or dentist to introduce themselves first.
- Never introduce yourself as the **clinic receptionist or dentist**.

2. **Conversation Guidelines:**
- Keep the conversation **short, concise, and to the point**.
- Avoid repeating the same information or questions.
- Speak politely and professionally at all times.
- Highlight the patient's preferred dates clearly.
- If the receptionist provides information, acknowledge it and move forward without restating it unnecessarily.
- If the receptionist speaks any other language, you must switch to that language for the rest of the call.

**Patient Details:**
- Name: {patient_name}
- Gender: {gender}
- Age: {age}
- Preferred Dates for Appointment: {preferred_dates}
- Relation to the Caller: {relation}
- Special Notes: {special_notes}

**Dentist Details:**
- Name: {dentist_name}
- Speciality: {specialty}
- Clinic: {clinic}
- Address: {address}

**Steps for the Call:**
1. **Introduction:**
- Start with: **\"Hello, I am calling on behalf of {patient_name} to book a dental appointment.\"**
- Wait for the receptionist or dentist to respond before proceeding.

2. **Request Appointment:**
- Ask: **\"Could you please let me know if there are any available appointments on {preferred_dates}?\"**
- If no slots are available on preferred dates, ask: **\"What is the earliest available appointment?\"**

3. **Confirm Details:**
- Once a slot is provided, confirm: **\"Could you please confirm the appointment for date at time?\"**
- Ask: **\"Are there any documents or preparations required for the appointment?\"**

4. **Closing the Call:**
- Thank the receptionist: **\"Thank you for your help. I appreciate it.\"**
- End the call politely: **\"Have a great day!\"**

**Key Reminders:**
- Do not repeat information unless absolutely necessary.
- Do not over-explain or provide unnecessary details.
- Stay focused on booking the appointment and avoid digressing.
- Always wait for the receptionist or dentist to respond before asking the next question.",
        patient_name = patient.name,
        gender = patient.gender,
        age = patient.age,
        preferred_dates = preferred_dates,
        relation = relation,
        special_notes = special_notes,
        dentist_name = dentist.name,
        specialty = dentist.specialty,
        clinic = dentist.clinic,
        address = dentist.address,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientProfile {
        PatientProfile {
            name: "John Doe".to_string(),
            gender: "Male".to_string(),
            age: "30".to_string(),
            relation: Some("Self".to_string()),
            special_notes: Some("Mild tooth pain, prefers mornings.".to_string()),
            preferred_dates: vec!["2025-02-20".to_string(), "2025-02-22".to_string()],
        }
    }

    fn dentist() -> ProviderProfile {
        ProviderProfile {
            name: "Dr. Emily Carter".to_string(),
            specialty: "Endodontist".to_string(),
            clinic: "Smile Dental Care".to_string(),
            address: "123 Main Street, Springfield".to_string(),
            phone_number: "+15551234567".to_string(),
        }
    }

    #[test]
    fn interpolates_all_profile_fields() {
        let script = build_agent_script(&patient(), &dentist());
        assert!(script.contains("John Doe"));
        assert!(script.contains("2025-02-20, 2025-02-22"));
        assert!(script.contains("Dr. Emily Carter"));
        assert!(script.contains("Smile Dental Care"));
        assert!(script.contains("Mild tooth pain"));
    }

    #[test]
    fn absent_optional_fields_render_placeholders() {
        let mut p = patient();
        p.relation = None;
        p.special_notes = None;
        p.preferred_dates = vec![];
        let script = build_agent_script(&p, &dentist());
        assert!(script.contains("Relation to the Caller: N/A"));
        assert!(script.contains("Special Notes: None"));
        assert!(script.contains("Preferred Dates for Appointment: None"));
    }

    #[test]
    fn no_unresolved_placeholders() {
        let mut p = patient();
        p.relation = None;
        p.special_notes = None;
        let script = build_agent_script(&p, &dentist());
        assert!(!script.contains('{'));
        assert!(!script.contains('}'));
    }

    #[test]
    fn embeds_fixed_behavioral_rules() {
        let script = build_agent_script(&patient(), &dentist());
        assert!(script.contains("NOT the receptionist or dentist"));
        assert!(script.contains("Wait for the receptionist or dentist to introduce themselves first"));
        assert!(script.contains("**Introduction:**"));
        assert!(script.contains("**Request Appointment:**"));
        assert!(script.contains("**Confirm Details:**"));
        assert!(script.contains("**Closing the Call:**"));
    }
}
