use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use suds_booking::repository::{RepoError, UserRepository};
use suds_booking::user::{User, UserType, VerificationStatus};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    user_type: String,
    student_id_number: String,
    student_verified: bool,
    verification_status: String,
    verified_by: Option<Uuid>,
    verified_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            user_type: UserType::parse(&row.user_type),
            student_id_number: row.student_id_number,
            student_verified: row.student_verified,
            verification_status: VerificationStatus::parse(&row.verification_status),
            verified_by: row.verified_by,
            verified_at: row.verified_at,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, user_type, \
     student_id_number, student_verified, verification_status, verified_by, \
     verified_at, is_active, created_at, updated_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, phone, user_type,
                 student_id_number, student_verified, verification_status,
                 is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.user_type.as_str())
        .bind(&user.student_id_number)
        .bind(user.student_verified)
        .bind(user.verification_status.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn pending_students(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE user_type = 'student' AND verification_status = 'pending' \
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn set_verification(
        &self,
        id: Uuid,
        approved: bool,
        verified_by: Uuid,
    ) -> Result<bool, RepoError> {
        let status = if approved {
            VerificationStatus::Approved
        } else {
            VerificationStatus::Rejected
        };
        let result = sqlx::query(
            r#"
            UPDATE users
            SET student_verified = $1,
                verification_status = $2,
                verified_by = $3,
                verified_at = NOW(),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(approved)
        .bind(status.as_str())
        .bind(verified_by)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
