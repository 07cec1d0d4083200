use serde::Serialize;

use crate::database::{
    Database, StoreError, collections,
    models::{AccountStatus, UserProfile, UserRole},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    name: &'static str,
    email: &'static str,
    role: UserRole,
    status: AccountStatus,
    email_verified: bool,
    roll_number: &'static str,
    department: &'static str,
    year: &'static str,
}

const FIXTURES: [(&str, &str, &str, &str, &str); 10] = [
    ("Aarav Sharma", "aarav.sharma@example.edu", "21CS001", "CSE", "4"),
    ("Diya Patel", "diya.patel@example.edu", "22EC014", "ECE", "3"),
    ("Ishaan Gupta", "ishaan.gupta@example.edu", "23ME027", "MECH", "2"),
    ("Ananya Iyer", "ananya.iyer@example.edu", "21IT033", "IT", "4"),
    ("Vihaan Reddy", "vihaan.reddy@example.edu", "24CS048", "CSE", "1"),
    ("Saanvi Nair", "saanvi.nair@example.edu", "22CS052", "CSE", "3"),
    ("Kabir Singh", "kabir.singh@example.edu", "23EE061", "EEE", "2"),
    ("Myra Joshi", "myra.joshi@example.edu", "21CS075", "CSE", "4"),
    ("Reyansh Das", "reyansh.das@example.edu", "24AI083", "AIML", "1"),
    ("Kiara Menon", "kiara.menon@example.edu", "22AI090", "AIML", "3"),
];

fn fixture_users() -> Vec<SeedUser> {
    FIXTURES
        .iter()
        .map(|&(name, email, roll_number, department, year)| SeedUser {
            name,
            email,
            role: UserRole::Member,
            status: AccountStatus::Active,
            email_verified: true,
            roll_number,
            department,
            year,
        })
        .collect()
}

/// Insert the fixture users in one batch and return how many were written.
pub async fn seed_users(db: &Database) -> Result<usize, StoreError> {
    let inserted: Vec<UserProfile> = db.batch_add(collections::USERS, &fixture_users()).await?;
    log::info!("Seeded {} users", inserted.len());
    Ok(inserted.len())
}
