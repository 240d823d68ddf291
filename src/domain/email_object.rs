use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateEmail;

/// An email address that passed syntax validation. Stored lower-cased so that
/// lookups by email do not depend on how the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailObject(String);

impl EmailObject {
    pub fn parse(s: String) -> Result<EmailObject, String> {
        let normalized = s.trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(format!("{} is not a valid email.", s))
        }
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailObject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn deserialize_email_object<'de, D>(deserializer: D) -> Result<EmailObject, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    EmailObject::parse(s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domain::EmailObject;

    #[derive(Debug, Clone)]
    struct ValidEmailFixture(pub String);

    impl Arbitrary for ValidEmailFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
            let email = SafeEmail().fake_with_rng(&mut rng);

            Self(email)
        }
    }

    #[quickcheck]
    fn valid_emails_are_parsed_successfully(valid_email: ValidEmailFixture) -> bool {
        EmailObject::parse(valid_email.0).is_ok()
    }

    #[test]
    fn emails_are_normalized() {
        let email = EmailObject::parse("  Buyer@Example.COM ".to_string()).unwrap();
        assert_eq!(email.get(), "buyer@example.com");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(EmailObject::parse("".to_string()).is_err());
    }

    #[test]
    fn email_missing_at_symbol_is_rejected() {
        assert!(EmailObject::parse("buyer.example.com".to_string()).is_err());
    }

    #[test]
    fn email_missing_subject_is_rejected() {
        assert!(EmailObject::parse("@example.com".to_string()).is_err());
    }
}
