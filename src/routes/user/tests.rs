#[cfg(test)]
mod tests {
    use crate::configuration::JWT;
    use crate::domain::EmailObject;
    use crate::routes::user::errors::{OtpVerificationError, UserRegistrationError};
    use crate::routes::user::models::UserOtpModel;
    use crate::routes::user::schemas::CreateUserAccount;
    use crate::routes::user::utils::{
        check_otp, compute_password_hash, fetch_latest_active_otp, generate_otp, get_auth_data,
        issue_otp, register_user, verify_password_hash, verify_user_otp, OtpCheck,
    };
    use crate::tests::tests::{get_dummy_user_account, get_test_pool};
    use crate::utils::decode_token;
    use chrono::{Duration, Utc};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use secrecy::{ExposeSecret, SecretString};

    fn otp_record(otp: &str, age_minutes: i64) -> UserOtpModel {
        UserOtpModel {
            id: 1,
            otp: otp.to_string(),
            created_on: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_check_otp() {
        let validity = Duration::minutes(10);
        let now = Utc::now();

        assert_eq!(
            check_otp(None, "123456", now, validity),
            Err(OtpVerificationError::NoActiveOtp)
        );
        let record = otp_record("123456", 1);
        assert_eq!(
            check_otp(Some(&record), "654321", now, validity),
            Err(OtpVerificationError::InvalidOtp)
        );
        assert_eq!(check_otp(Some(&record), "123456", now, validity), Ok(()));
        assert_eq!(check_otp(Some(&record), " 123456 ", now, validity), Ok(()));

        let stale = otp_record("123456", 11);
        assert_eq!(
            check_otp(Some(&stale), "123456", now, validity),
            Err(OtpVerificationError::Expired)
        );
        // A wrong code on a stale record reports the mismatch first.
        assert_eq!(
            check_otp(Some(&stale), "000000", now, validity),
            Err(OtpVerificationError::InvalidOtp)
        );
    }

    #[test]
    fn test_otp_error_messages() {
        assert_eq!(
            OtpVerificationError::NoActiveOtp.to_string(),
            "No active OTP found for this email."
        );
        assert_eq!(OtpVerificationError::InvalidOtp.to_string(), "Invalid OTP.");
        assert_eq!(OtpVerificationError::Expired.to_string(), "OTP expired.");
    }

    #[test]
    fn test_generated_otp_is_six_digits() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_password_hash_verification() {
        let hash = compute_password_hash(SecretString::from("s3cret-pass".to_string())).unwrap();
        assert!(hash.expose_secret().starts_with("$argon2id$"));
        assert!(verify_password_hash(
            SecretString::from(hash.expose_secret().to_string()),
            SecretString::from("s3cret-pass".to_string())
        )
        .is_ok());
        assert!(verify_password_hash(hash, SecretString::from("wrong".to_string())).is_err());
    }

    #[test]
    fn test_auth_data_token_belongs_to_user() {
        let jwt = JWT {
            secret: SecretString::from("test-secret".to_string()),
            expiry: 1,
        };
        let user = get_dummy_user_account(42, "buyer@example.com");
        let auth = get_auth_data(user, &jwt).unwrap();
        assert_eq!(auth.token_type, "bearer");
        assert_eq!(decode_token(auth.access_token, &jwt.secret).unwrap(), 42);
    }

    fn new_account(email: &str, password: &str, confirm: &str) -> CreateUserAccount {
        CreateUserAccount {
            email: EmailObject::parse(email.to_string()).unwrap(),
            password: SecretString::from(password.to_string()),
            confirm_password: SecretString::from(confirm.to_string()),
            first_name: Some("Sanu".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres"]
    async fn test_register_rejects_mismatch_and_duplicates() {
        let pool = get_test_pool().await;
        let email: String = SafeEmail().fake();

        let mismatch = register_user(&pool, new_account(&email, "abc12345", "abc12346")).await;
        assert!(matches!(mismatch, Err(UserRegistrationError::PasswordMismatch)));

        let created = register_user(&pool, new_account(&email, "abc12345", "abc12345")).await;
        assert!(created.is_ok());
        let duplicate = register_user(&pool, new_account(&email, "abc12345", "abc12345")).await;
        assert!(matches!(duplicate, Err(UserRegistrationError::DuplicateEmail)));
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres"]
    async fn test_new_otp_expires_the_previous_one() {
        let pool = get_test_pool().await;
        let email: String = SafeEmail().fake();
        register_user(&pool, new_account(&email, "abc12345", "abc12345"))
            .await
            .unwrap();

        let first = issue_otp(&pool, &email).await.unwrap();
        let second = issue_otp(&pool, &email).await.unwrap();
        let active = fetch_latest_active_otp(&pool, &email).await.unwrap().unwrap();
        assert_eq!(active.otp, second);

        if first != second {
            let check = verify_user_otp(&pool, &email, &first, Duration::minutes(10))
                .await
                .unwrap();
            assert!(matches!(
                check,
                OtpCheck::Rejected(OtpVerificationError::InvalidOtp)
            ));
        }
        let check = verify_user_otp(&pool, &email, &second, Duration::minutes(10))
            .await
            .unwrap();
        assert!(matches!(check, OtpCheck::Verified));
        assert!(fetch_latest_active_otp(&pool, &email).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres"]
    async fn test_expired_otp_is_marked_expired() {
        let pool = get_test_pool().await;
        let email: String = SafeEmail().fake();
        sqlx::query(
            "INSERT INTO user_otp (email, otp, expired, created_on) \
             VALUES ($1, '123456', FALSE, now() - interval '1 hour')",
        )
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

        let check = verify_user_otp(&pool, &email, "123456", Duration::minutes(10))
            .await
            .unwrap();
        assert!(matches!(check, OtpCheck::Rejected(OtpVerificationError::Expired)));
        assert!(fetch_latest_active_otp(&pool, &email).await.unwrap().is_none());
    }
}
