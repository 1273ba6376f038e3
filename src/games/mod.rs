pub mod math_quiz;
