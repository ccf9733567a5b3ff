use chrono::{Duration, Local};
use rand::Rng;
use rusqlite::Connection;

use crate::error::Result;
use crate::models::Category;

pub const SEED_COUNT: usize = 100;

const SALARY_RANGE: (f64, f64) = (2000.0, 5000.0);
const EXPENSE_RANGE: (f64, f64) = (5.0, 500.0);

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Insert `count` synthetic transactions: dates uniform over the last 365
/// days, categories uniform over the fixed label set. Salary rows are income
/// in the salary band; everything else is an expense in the small band.
/// Demo fixture only, never called from the conversational flows.
pub fn seed_random_transactions(conn: &Connection, count: usize) -> Result<usize> {
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();

    for _ in 0..count {
        let days_ago = rng.gen_range(0..=365);
        let date = (today - Duration::days(days_ago)).to_string();
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];

        let (amount, expense, description) = if category == Category::Salary {
            let amount = round_cents(rng.gen_range(SALARY_RANGE.0..=SALARY_RANGE.1));
            (amount, false, "Monthly salary".to_string())
        } else {
            let amount = round_cents(rng.gen_range(EXPENSE_RANGE.0..=EXPENSE_RANGE.1));
            (amount, true, format!("{category} expense"))
        };

        conn.execute(
            "INSERT INTO transactions (date, category, amount, description, expense) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![date, category.as_str(), amount, description, expense],
        )?;
    }

    Ok(count)
}
