use crate::models::user::{EducationEntry, ExperienceEntry, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    /// Merged into the existing skill set, duplicates removed.
    pub skills: Option<Vec<String>>,
    /// Replaces the stored history wholesale when present.
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
}

/// Profile shape safe to show to anyone: no email, no roles, no tokens.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            location: user.location,
            profile_image: user.profile_image,
            skills: user.skills,
            experience: user.experience.0,
            education: user.education.0,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_update_carries_experience_and_education() {
        let payload: UpdateProfileRequest = serde_json::from_value(json!({
            "experience": [{
                "title": "Data Analyst",
                "company": "Acme",
                "start_date": "2021-03-01T00:00:00Z",
                "current": true,
            }],
            "education": [{
                "school": "State University",
                "degree": "BSc",
                "field_of_study": "Statistics",
            }],
        }))
        .unwrap();

        let experience = payload.experience.unwrap();
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].title, "Data Analyst");
        assert!(experience[0].current);
        assert!(experience[0].end_date.is_none());

        let education = payload.education.unwrap();
        assert_eq!(education[0].school, "State University");
        assert!(!education[0].current);
    }
}
