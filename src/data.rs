use crate::cars::checked_hp;
use crate::errors::LoadError;
use crate::models::{CarRecord, Question};
use serde::de::DeserializeOwned;
use std::fs;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

pub fn parse_questions(content: &str, path: &Path) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = parse_records(content, path)?;
    for (index, question) in questions.iter().enumerate() {
        validate_question(question).map_err(|reason| LoadError::InvalidRecord { index, reason })?;
    }
    Ok(questions)
}

pub fn parse_cars(content: &str, path: &Path) -> Result<Vec<CarRecord>, LoadError> {
    let cars: Vec<CarRecord> = parse_records(content, path)?;
    for (index, car) in cars.iter().enumerate() {
        if checked_hp(car.power_kw).is_none() {
            return Err(LoadError::InvalidRecord {
                index,
                reason: format!(
                    "powerKW must give between 1 and {} hp, got {}",
                    u32::MAX,
                    car.power_kw
                ),
            });
        }
    }
    Ok(cars)
}

fn parse_records<T: DeserializeOwned>(content: &str, path: &Path) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_question(question: &Question) -> Result<(), String> {
    if question.text.trim().is_empty() {
        return Err("question text is empty".to_string());
    }
    if question.options.len() < 2 {
        return Err(format!(
            "needs at least 2 answers, has {}",
            question.options.len()
        ));
    }
    if question.correct_option_index >= question.options.len() {
        return Err(format!(
            "correctAnswer {} is out of range for {} answers",
            question.correct_option_index,
            question.options.len()
        ));
    }
    Ok(())
}

pub fn load_questions(path: &Path) -> Result<Vec<Question>, LoadError> {
    let content = read(path)?;
    parse_questions(&content, path)
}

pub fn load_cars(path: &Path) -> Result<Vec<CarRecord>, LoadError> {
    let content = read(path)?;
    parse_cars(&content, path)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_async(path: &Path, timeout: Duration) -> Result<String, LoadError> {
    read_within(path, timeout, tokio::fs::read_to_string(path)).await
}

async fn read_within<F>(path: &Path, timeout: Duration, read: F) -> Result<String, LoadError>
where
    F: Future<Output = io::Result<String>>,
{
    match tokio::time::timeout(timeout, read).await {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(source)) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
        Err(_) => Err(LoadError::TimedOut {
            path: path.to_path_buf(),
            after: timeout,
        }),
    }
}

pub async fn fetch_questions(path: &Path, timeout: Duration) -> Result<Vec<Question>, LoadError> {
    let content = read_async(path, timeout).await?;
    parse_questions(&content, path)
}

pub async fn fetch_cars(path: &Path, timeout: Duration) -> Result<Vec<CarRecord>, LoadError> {
    let content = read_async(path, timeout).await?;
    parse_cars(&content, path)
}
