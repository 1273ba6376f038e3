pub mod engine;
pub mod options;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

pub use engine::{generate_arithmetic_question, generate_geometry_question, generate_question};

pub const ARITHMETIC_XP: i64 = 10;
pub const GEOMETRY_XP: i64 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionMode {
    #[default]
    Mixed,
    Arithmetic,
    Geometry,
}

impl FromStr for QuestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mixed" => Ok(QuestionMode::Mixed),
            "arithmetic" => Ok(QuestionMode::Arithmetic),
            "geometry" => Ok(QuestionMode::Geometry),
            other => Err(format!("Unknown question mode: {other}")),
        }
    }
}

impl fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionMode::Mixed => "mixed",
            QuestionMode::Arithmetic => "arithmetic",
            QuestionMode::Geometry => "geometry",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Arithmetic,
    Geometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add => "addition",
            Operator::Subtract => "subtraction",
            Operator::Multiply => "multiplication",
            Operator::Divide => "division",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Triangle,
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Area,
    Perimeter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub dimensions: Vec<u32>,
    /// Path in a 240x120 view box, centred on (120, 60).
    pub svg_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub operation: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shape: Option<Shape>,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }

    pub fn xp_for(&self, selected: usize) -> i64 {
        xp_for_answer(self.kind, self.is_correct(selected))
    }
}

pub fn xp_for_answer(kind: QuestionKind, correct: bool) -> i64 {
    match (kind, correct) {
        (_, false) => 0,
        (QuestionKind::Arithmetic, true) => ARITHMETIC_XP,
        (QuestionKind::Geometry, true) => GEOMETRY_XP,
    }
}
