//! Madpakke-Magikeren - a lunchbox builder for kids
//!
//! Pick one item from each of four categories, get an upbeat verdict and an
//! illustration from a generative AI service, and collect finished lunchboxes
//! into a Monday-to-Friday plan that can be printed.
//!
//! # Modules
//!
//! - [`domain`] - Catalog, selections, prices and the weekly plan
//! - [`session`] - The selection flow and planner state
//! - [`advice`] - Encouragement chat built on the text model
//! - [`illustrator`] - Lunchbox pictures built on the image model
//! - [`genai`] - Generative AI client trait and Gemini implementation
//! - [`prompts`] - Prompt templates with user overrides
//! - [`export`] - Text and printable HTML rendering of the plan
//! - [`config`] - Configuration types and loading
//! - [`cli`] / [`repl`] - Command-line and interactive front ends

pub mod advice;
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod genai;
pub mod illustrator;
pub mod prompts;
pub mod repl;
pub mod session;

pub use advice::Advisor;
pub use config::Config;
pub use domain::{Category, FoodItem, Price, SavedLunchbox, Selection, Weekday, WeeklyPlan};
pub use genai::{GenAiClient, GenAiError};
pub use illustrator::Illustrator;
pub use prompts::PromptLoader;
pub use session::{FlowStep, LunchboxSession, SessionError};
