//! Fixed job-market datasets served by the mock feeds.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobTrend {
    pub name: &'static str,
    /// Year-over-year growth, percent.
    pub growth: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSkill {
    pub id: u32,
    pub name: &'static str,
    pub industry: &'static str,
    pub growth_rate: u32,
    pub demand_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsight {
    pub id: u32,
    pub name: &'static str,
    pub growth_rate: u32,
    pub job_openings: u32,
    pub top_skill: &'static str,
}

pub fn job_trends() -> Vec<JobTrend> {
    [
        ("Software Development", 24),
        ("Data Science", 37),
        ("Cloud Computing", 41),
        ("Cybersecurity", 35),
        ("DevOps", 29),
        ("AI/Machine Learning", 48),
        ("Blockchain", 19),
        ("UX/UI Design", 22),
        ("Digital Marketing", 15),
        ("Project Management", 13),
    ]
    .into_iter()
    .map(|(name, growth)| JobTrend { name, growth })
    .collect()
}

pub fn top_skills() -> Vec<TopSkill> {
    [
        ("Machine Learning", "Technology", 120, 95),
        ("Cloud Architecture", "Technology", 95, 88),
        ("Data Analysis", "Technology", 85, 92),
        ("Cybersecurity", "Technology", 78, 90),
        ("DevOps", "Technology", 75, 85),
        ("React.js", "Technology", 68, 82),
        ("Python", "Technology", 62, 89),
        ("Digital Marketing", "Marketing", 55, 78),
        ("UX/UI Design", "Design", 48, 75),
        ("Project Management", "Management", 35, 80),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, industry, growth_rate, demand_level), id)| TopSkill {
        id,
        name,
        industry,
        growth_rate,
        demand_level,
    })
    .collect()
}

pub fn industry_insights() -> Vec<IndustryInsight> {
    [
        ("Technology", 35, 250_000, "Software Development"),
        ("Healthcare", 28, 180_000, "Patient Care"),
        ("Finance", 22, 120_000, "Financial Analysis"),
        ("Education", 18, 90_000, "Instructional Design"),
        ("Manufacturing", 15, 85_000, "Process Optimization"),
        ("Renewable Energy", 42, 75_000, "Sustainable Engineering"),
    ]
    .into_iter()
    .zip(1..)
    .map(
        |((name, growth_rate, job_openings, top_skill), id)| IndustryInsight {
            id,
            name,
            growth_rate,
            job_openings,
            top_skill,
        },
    )
    .collect()
}
