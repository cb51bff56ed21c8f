pub mod adherence;
pub mod alert;
pub mod dose;
pub mod frequency;
pub mod glucose;
pub mod medication;
