//! Rewrite the stored BMR and daily calorie goal of every profile from its inputs
//! Usage: cargo run --bin recalculate_profiles -- [--dry-run]

use calorie_tracker::config;
use calorie_tracker::db::{migrations, Database};
use calorie_tracker::models::UserProfile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dry_run = std::env::args().skip(1).any(|a| a == "--dry-run");

    let db_path = config::database_path();
    println!("Database: {}", db_path.display());

    let database = Database::new(&db_path)?;

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let profiles = UserProfile::list(conn)?;
        println!("Found {} profiles", profiles.len());

        let mut changed = 0;
        for profile in &profiles {
            let Some((old_bmr, old_goal)) = UserProfile::stored_derived(conn, &profile.id)? else {
                continue;
            };

            if (old_bmr - profile.bmr()).abs() < 1e-6 && old_goal == profile.daily_calorie_goal() {
                continue;
            }

            println!("\nProfile {} ({})", profile.id, profile.name());
            println!("  BMR: {:.2} -> {:.2}", old_bmr, profile.bmr());
            println!("  Daily goal: {} -> {} ({:+})",
                old_goal,
                profile.daily_calorie_goal(),
                profile.daily_calorie_goal() - old_goal
            );

            if !dry_run {
                profile.update(conn)?;
            }
            changed += 1;
        }

        if dry_run {
            println!("\n{} profiles would change", changed);
        } else {
            println!("\nUpdated {} profiles", changed);
        }
        Ok(())
    })?;

    Ok(())
}
