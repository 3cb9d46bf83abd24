//! Keyword-rule skill categorization for the SKILLS cell.
//!
//! Rules are tried in priority order and the first whose keyword appears
//! (case-insensitively) inside the skill wins, so every skill lands in exactly one
//! category. Output follows `CATEGORY_ORDER`, not rule order.

/// Bucket for skills that match no rule.
pub const DEFAULT_CATEGORY: &str = "Supporting tools";

/// Display order of categories in the rendered cell.
pub const CATEGORY_ORDER: &[&str] = &[
    "Programming Language",
    "Backend Development",
    "Frontend Development",
    "Cloud & DevOps",
    "Database",
    "Web Services",
    "CI/CD",
    "Supporting tools",
    "Methodologies",
];

/// One categorization rule: any keyword contained in a skill assigns it to `category`.
#[derive(Debug, Clone, Copy)]
pub struct SkillRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}

impl SkillRule {
    pub fn matches(&self, skill_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| skill_lower.contains(&kw.to_lowercase()))
    }
}

/// Rules in evaluation priority. Order matters: "Azure DevOps" is claimed by the
/// cloud rule before the CI/CD rule ever sees it.
pub const SKILL_RULES: &[SkillRule] = &[
    SkillRule {
        category: "Programming Language",
        keywords: &["C#", "Java", "JavaScript", "TypeScript", "Python"],
    },
    SkillRule {
        category: "Backend Development",
        keywords: &[".NET Core", "Spring Boot", "Node.js"],
    },
    SkillRule {
        category: "Frontend Development",
        keywords: &["Angular", "React", "Vue", "HTML", "CSS", "Bootstrap"],
    },
    SkillRule {
        category: "Cloud & DevOps",
        keywords: &["AWS", "Azure", "Docker", "Kubernetes"],
    },
    SkillRule {
        category: "Database",
        keywords: &["PostgreSQL", "MySQL", "MSSQL", "MongoDB", "Oracle"],
    },
    SkillRule {
        category: "Web Services",
        keywords: &["REST", "SOAP", "GraphQL"],
    },
    SkillRule {
        category: "CI/CD",
        keywords: &["Jenkins", "Azure DevOps", "CI/CD", "GitHub Actions"],
    },
    SkillRule {
        category: "Supporting tools",
        keywords: &["Git", "Jira", "Maven", "NPM", "SonarQube", "Swagger"],
    },
    // Integration platforms are presented alongside backend work.
    SkillRule {
        category: "Backend Development",
        keywords: &["SnapLogic", "MuleSoft", "Boomi"],
    },
];

/// Skills grouped under a category name, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category: &'static str,
    pub skills: Vec<String>,
}

/// Returns the category the first matching rule assigns, or `DEFAULT_CATEGORY`.
pub fn categorize_skill(skill: &str, rules: &[SkillRule]) -> &'static str {
    let lower = skill.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Partitions `skills` into non-empty groups ordered by `CATEGORY_ORDER`.
///
/// A rule whose category is not declared there files its skills under
/// `DEFAULT_CATEGORY`, so every input skill lands in exactly one group.
pub fn categorize_skills(skills: &[String], rules: &[SkillRule]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = CATEGORY_ORDER
        .iter()
        .map(|&category| SkillGroup {
            category,
            skills: Vec::new(),
        })
        .collect();

    for skill in skills {
        let category = categorize_skill(skill, rules);
        let slot = groups
            .iter()
            .position(|g| g.category == category)
            .or_else(|| groups.iter().position(|g| g.category == DEFAULT_CATEGORY));
        if let Some(index) = slot {
            groups[index].skills.push(skill.clone());
        }
    }

    groups.retain(|g| !g.skills.is_empty());
    groups
}
