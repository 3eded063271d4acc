//! Built-in quick searches and the autocomplete vocabularies for the search form.

use serde::{Deserialize, Serialize};

use crate::ranking::filters::FilterQuery;

#[derive(Debug, Clone, Serialize)]
pub struct SearchPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub required_skills: &'static [&'static str],
    pub preferred_skills: &'static [&'static str],
    pub min_experience: f64,
    pub job_description: &'static str,
}

impl SearchPreset {
    /// The form state the preset fills in. Fields the preset does not cover are blank.
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            required_skills_raw: self.required_skills.join(", "),
            preferred_skills_raw: self.preferred_skills.join(", "),
            job_description: self.job_description.to_string(),
            min_experience: Some(self.min_experience),
            ..Default::default()
        }
    }
}

pub static SEARCH_PRESETS: [SearchPreset; 4] = [
    SearchPreset {
        name: "Senior Backend",
        description: "Desarrollador backend con 5+ años de experiencia",
        required_skills: &["node", "typescript", "postgresql"],
        preferred_skills: &["docker", "aws", "redis"],
        min_experience: 5.0,
        job_description: "Buscamos un desarrollador backend senior para liderar proyectos críticos",
    },
    SearchPreset {
        name: "Fullstack Mid",
        description: "Desarrollador fullstack con 3+ años de experiencia",
        required_skills: &["react", "node", "typescript"],
        preferred_skills: &["next.js", "tailwind", "prisma"],
        min_experience: 3.0,
        job_description: "Desarrollador fullstack para trabajar en aplicaciones web modernas",
    },
    SearchPreset {
        name: "Frontend Junior",
        description: "Desarrollador frontend junior o trainee",
        required_skills: &["html", "css", "javascript"],
        preferred_skills: &["react", "typescript", "tailwind"],
        min_experience: 0.0,
        job_description: "Buscamos talento junior con ganas de aprender y crecer",
    },
    SearchPreset {
        name: "DevOps Engineer",
        description: "Ingeniero DevOps con experiencia en cloud",
        required_skills: &["docker", "kubernetes", "aws"],
        preferred_skills: &["terraform", "jenkins", "monitoring"],
        min_experience: 4.0,
        job_description: "Ingeniero DevOps para optimizar infraestructura y CI/CD",
    },
];

pub fn find_preset(name: &str) -> Option<&'static SearchPreset> {
    SEARCH_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

const TECH_SKILLS: &[&str] = &[
    "javascript", "typescript", "python", "java", "c#", "php", "ruby", "go", "rust", "swift",
    "react", "vue", "angular", "svelte", "next.js", "nuxt", "gatsby",
    "node.js", "express", "nestjs", "django", "flask", "spring", "laravel", "rails",
    "html", "css", "sass", "tailwind", "bootstrap", "material-ui",
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "firebase",
    "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "jenkins",
    "git", "github", "gitlab", "ci/cd", "agile", "scrum", "jira",
    "linux", "ubuntu", "windows", "macos", "bash", "powershell",
    "testing", "jest", "cypress", "selenium", "unit testing", "e2e",
    "security", "authentication", "authorization", "oauth", "jwt",
    "performance", "optimization", "caching", "cdn", "load balancing",
    "microservices", "api", "rest", "graphql", "websockets", "gRPC",
];

const CITIES: &[&str] = &[
    "Buenos Aires", "Córdoba", "Rosario", "Mendoza", "La Plata", "Mar del Plata",
    "Salta", "San Miguel de Tucumán", "Santa Fe", "San Juan", "Resistencia",
    "Neuquén", "Bahía Blanca", "Corrientes", "Formosa", "San Salvador de Jujuy",
    "Paraná", "Posadas", "Santiago del Estero", "Catamarca", "Ushuaia",
    "Río Gallegos", "Viedma", "Rawson", "Santa Rosa", "San Luis",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Skills,
    Cities,
}

/// Case-insensitive substring autocomplete. An empty input suggests nothing.
pub fn suggest(kind: SuggestionKind, input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }
    let pool = match kind {
        SuggestionKind::Skills => TECH_SKILLS,
        SuggestionKind::Cities => CITIES,
    };
    pool.iter()
        .copied()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .collect()
}
