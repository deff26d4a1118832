//! The `quizlens init` command.

use anyhow::Result;

use quizlens_store::load_config;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizlens.toml").exists() {
        println!("quizlens.toml already exists, skipping.");
    } else {
        std::fs::write("quizlens.toml", SAMPLE_CONFIG)?;
        println!("Created quizlens.toml");
    }

    let config = load_config()?;
    std::fs::create_dir_all(&config.storage.data_dir)?;

    let attempts_path = config.storage.attempts_path();
    if attempts_path.exists() {
        println!("{} already exists, skipping.", attempts_path.display());
    } else {
        std::fs::write(&attempts_path, SAMPLE_ATTEMPTS)?;
        println!("Created {}", attempts_path.display());
    }

    let reports_path = config.storage.reports_path();
    if reports_path.exists() {
        println!("{} already exists, skipping.", reports_path.display());
    } else {
        std::fs::write(&reports_path, "[]\n")?;
        println!("Created {}", reports_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Import or record quiz attempts into the data directory");
    println!("  2. Run: quizlens stats");
    println!("  3. Run: quizlens improve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizlens configuration

[storage]
data_dir = "./quizlens-data"
attempts_file = "attempts.json"
reports_file = "reports.json"

[analytics]
# Minimum attempts before a question enters ranked views.
min_attempts = 3
# Default number of questions returned by list views.
default_limit = 20
# Default success-rate ceiling for the improvement list.
max_success_rate = 60.0
"#;

const SAMPLE_ATTEMPTS: &str = r#"[
  {
    "id": "7e0c2f5e-3f6a-4a52-9c1d-0b8f4a2e6d31",
    "mode": "elimination",
    "topic": "OOP",
    "difficulty": "easy",
    "user_name": "sample_user",
    "score": 50.0,
    "created_at": "2026-01-15T10:30:00Z",
    "outcomes": [
      {
        "question_id": "sample_q1",
        "question_text": "What is polymorphism?",
        "correct_answer": 0,
        "options": ["Many forms", "One form", "No form", "Complex form"],
        "user_answer": 0,
        "is_correct": true
      },
      {
        "question_id": "sample_q2",
        "question_text": "What is encapsulation?",
        "correct_answer": 1,
        "options": ["Data exposure", "Data hiding", "Data copying", "Data deletion"],
        "user_answer": 2,
        "is_correct": false
      }
    ]
  }
]
"#;
