//! Clients for the hosted AI services
//!
//! The quiz recommender turns a candidate's answers into a primary training
//! program, complementary modules and a motivation message. The blog bot
//! writes articles grounded on training documents. Both live behind plain
//! JSON-over-HTTP endpoints.

pub mod client;
pub mod schema;

pub use client::{
    BlogClient, HttpClient, RecommendationService, RecommenderClient, ServiceConfig,
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};
pub use schema::{
    Answers, BlogArticle, ExpertiseScores, ProgramDetails, QuizInput, RecommendationOutput,
};
