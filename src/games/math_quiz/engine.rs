use rand::{Rng, seq::IndexedRandom};
use uuid::Uuid;

use crate::games::math_quiz::{
    Measure, Operator, Question, QuestionKind, QuestionMode, Shape, ShapeKind,
    options::{Perturbation, build_options},
};

/// Pixels per unit when drawing shapes.
const SHAPE_SCALE: i64 = 8;
const VIEW_CENTER: (i64, i64) = (120, 60);
const TRIANGLE_PERIMETER_PATH: &str = "M 85 85 L 120 25 L 155 85 Z";

pub fn generate_question<R: Rng + ?Sized>(mode: QuestionMode, rng: &mut R) -> Question {
    let kind = match mode {
        QuestionMode::Arithmetic => QuestionKind::Arithmetic,
        QuestionMode::Geometry => QuestionKind::Geometry,
        QuestionMode::Mixed => {
            if rng.random_bool(0.5) {
                QuestionKind::Geometry
            } else {
                QuestionKind::Arithmetic
            }
        }
    };

    match kind {
        QuestionKind::Arithmetic => generate_arithmetic_question(rng),
        QuestionKind::Geometry => generate_geometry_question(rng),
    }
}

pub fn generate_arithmetic_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let operator = *Operator::ALL.choose(rng).unwrap_or(&Operator::Add);

    let (left, right, answer) = match operator {
        Operator::Add => {
            let a = rng.random_range(1..=50);
            let b = rng.random_range(1..=50);
            (a, b, a + b)
        }
        Operator::Subtract => {
            let a = rng.random_range(25..=74);
            let b = rng.random_range(1..=25);
            (a, b, a - b)
        }
        Operator::Multiply => {
            let a = rng.random_range(1..=12);
            let b = rng.random_range(1..=12);
            (a, b, a * b)
        }
        Operator::Divide => {
            // Built backwards so the quotient is always whole
            let divisor = rng.random_range(1..=12);
            let quotient = rng.random_range(1..=12);
            (divisor * quotient, divisor, quotient)
        }
    };

    let perturbation = match operator {
        Operator::Divide => Perturbation::Whole { low: -5, high: 5 },
        _ => Perturbation::Whole { low: -10, high: 10 },
    };
    let (options, correct_answer) = build_options(answer * 10, perturbation, rng);

    Question {
        id: Uuid::new_v4(),
        question: format!("{} {} {} = ?", left, operator.symbol(), right),
        options,
        correct_answer,
        operation: operator.name().to_string(),
        kind: QuestionKind::Arithmetic,
        shape: None,
    }
}

pub fn generate_geometry_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let shape_kind = if rng.random_bool(0.5) {
        ShapeKind::Triangle
    } else {
        ShapeKind::Rectangle
    };
    let measure = if rng.random_bool(0.5) {
        Measure::Area
    } else {
        Measure::Perimeter
    };

    let (dimensions, answer_tenths, svg_path) = match (shape_kind, measure) {
        (ShapeKind::Triangle, Measure::Area) => {
            let base = rng.random_range(3..=12);
            let height = rng.random_range(3..=10);
            // base * height / 2, in tenths
            let answer = base * height * 5;
            (vec![base, height], answer, triangle_path(base, height))
        }
        (ShapeKind::Triangle, Measure::Perimeter) => {
            let sides: Vec<i64> = (0..3).map(|_| rng.random_range(4..=11)).collect();
            let answer = sides.iter().sum::<i64>() * 10;
            (sides, answer, TRIANGLE_PERIMETER_PATH.to_string())
        }
        (ShapeKind::Rectangle, measure) => {
            let length = rng.random_range(4..=11);
            let width = rng.random_range(3..=8);
            let answer = match measure {
                Measure::Area => length * width * 10,
                Measure::Perimeter => 2 * (length + width) * 10,
            };
            (vec![length, width], answer, rectangle_path(length, width))
        }
    };

    let (options, correct_answer) =
        build_options(answer_tenths, Perturbation::for_geometry(answer_tenths), rng);

    let shape_name = shape_name(shape_kind);
    let measure_name = measure_name(measure);

    Question {
        id: Uuid::new_v4(),
        question: format!("What is the {measure_name} of this {shape_name}?"),
        options,
        correct_answer,
        operation: format!("geometry-{shape_name}-{measure_name}"),
        kind: QuestionKind::Geometry,
        shape: Some(Shape {
            kind: shape_kind,
            dimensions: dimensions.into_iter().map(|d| d as u32).collect(),
            svg_path,
        }),
    }
}

fn shape_name(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Triangle => "triangle",
        ShapeKind::Rectangle => "rectangle",
    }
}

fn measure_name(measure: Measure) -> &'static str {
    match measure {
        Measure::Area => "area",
        Measure::Perimeter => "perimeter",
    }
}

fn centered_origin(width: i64, height: i64) -> (i64, i64) {
    (VIEW_CENTER.0 - width / 2, VIEW_CENTER.1 - height / 2)
}

fn triangle_path(base: i64, height: i64) -> String {
    let (w, h) = (base * SHAPE_SCALE, height * SHAPE_SCALE);
    let (x, y) = centered_origin(w, h);
    // Base along the bottom edge, apex on top (SVG y grows downwards)
    format!(
        "M {} {} L {} {} L {} {} Z",
        x,
        y + h,
        x + w,
        y + h,
        x + w / 2,
        y
    )
}

fn rectangle_path(length: i64, width: i64) -> String {
    let (w, h) = (length * SHAPE_SCALE, width * SHAPE_SCALE);
    let (x, y) = centered_origin(w, h);
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        x,
        y,
        x + w,
        y,
        x + w,
        y + h,
        x,
        y + h
    )
}
