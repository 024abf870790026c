use super::{CatalogueCategory, SkillCatalogue, SkillDefinition, SkillPattern};

pub(super) fn catalogue() -> SkillCatalogue {
    SkillCatalogue {
        categories: vec![
            languages(),
            frameworks(),
            databases(),
            cloud_devops(),
            data_ml(),
            practices(),
        ],
    }
}

fn category(name: &str, skills: Vec<(&str, Vec<&str>)>) -> CatalogueCategory {
    CatalogueCategory {
        name: name.to_string(),
        skills: skills
            .into_iter()
            .map(|(skill, aliases)| SkillDefinition::new(skill, &aliases))
            .collect(),
    }
}

fn languages() -> CatalogueCategory {
    let mut category = category(
        "Programming Languages",
        vec![
            ("Python", vec!["python3"]),
            ("JavaScript", vec!["js", "ecmascript", "es6"]),
            ("TypeScript", vec!["ts"]),
            ("Java", vec![]),
            ("Kotlin", vec![]),
            ("Swift", vec![]),
            ("C++", vec!["cpp"]),
            ("C#", vec!["csharp"]),
            ("Rust", vec![]),
            ("Ruby", vec![]),
            ("PHP", vec![]),
            ("Scala", vec![]),
            ("Elixir", vec![]),
            ("SQL", vec!["plsql", "t-sql"]),
            ("Bash", vec!["shell scripting"]),
        ],
    );

    // "go" alone is an everyday word
    category.skills.push(SkillDefinition::with_patterns(
        "Go",
        vec![
            SkillPattern::Token("golang".to_string()),
            SkillPattern::Regex(r"go\s+(?:developer|engineer|programming|language)".to_string()),
        ],
    ));

    category
}

fn frameworks() -> CatalogueCategory {
    let mut category = category(
        "Frameworks",
        vec![
            // Frontend
            ("React", vec!["reactjs", "react.js"]),
            ("Vue", vec!["vuejs", "vue.js"]),
            ("Angular", vec!["angularjs"]),
            ("Svelte", vec!["sveltekit"]),
            ("Next.js", vec!["nextjs"]),
            // Backend
            ("Node.js", vec!["nodejs"]),
            ("Django", vec![]),
            ("Flask", vec![]),
            ("FastAPI", vec![]),
            ("Rails", vec!["ruby on rails", "ror"]),
            ("Laravel", vec![]),
            (".NET", vec!["dotnet", "asp.net", ".net core"]),
            // Mobile
            ("React Native", vec!["react-native"]),
            ("Flutter", vec![]),
        ],
    );

    category.skills.push(SkillDefinition::with_patterns(
        "Express",
        vec![
            SkillPattern::Token("expressjs".to_string()),
            SkillPattern::Token("express.js".to_string()),
        ],
    ));
    category.skills.push(SkillDefinition::with_patterns(
        "Spring",
        vec![
            SkillPattern::Token("spring boot".to_string()),
            SkillPattern::Token("springboot".to_string()),
            SkillPattern::Token("spring framework".to_string()),
        ],
    ));

    category
}

fn databases() -> CatalogueCategory {
    category(
        "Databases",
        vec![
            ("PostgreSQL", vec!["postgres", "psql"]),
            ("MySQL", vec!["mariadb"]),
            ("MongoDB", vec!["mongo"]),
            ("Redis", vec![]),
            ("Elasticsearch", vec!["elastic search", "opensearch"]),
            ("SQLite", vec![]),
            ("DynamoDB", vec![]),
            ("Cassandra", vec![]),
            ("Snowflake", vec![]),
        ],
    )
}

fn cloud_devops() -> CatalogueCategory {
    let mut category = category(
        "Cloud & DevOps",
        vec![
            ("AWS", vec!["amazon web services"]),
            ("GCP", vec!["google cloud", "google cloud platform"]),
            ("Azure", vec!["microsoft azure"]),
            ("Docker", vec!["dockerfile"]),
            ("Kubernetes", vec!["k8s"]),
            ("Terraform", vec![]),
            ("Ansible", vec![]),
            ("Jenkins", vec![]),
            ("GitHub Actions", vec![]),
            ("Git", vec![]),
            ("Linux", vec![]),
            ("Kafka", vec!["apache kafka"]),
            ("GraphQL", vec![]),
        ],
    );

    category.skills.push(SkillDefinition::with_patterns(
        "REST",
        vec![
            SkillPattern::Token("restful".to_string()),
            SkillPattern::Regex(r"rest\s+apis?".to_string()),
        ],
    ));

    category
}

fn data_ml() -> CatalogueCategory {
    category(
        "Data & ML",
        vec![
            ("Machine Learning", vec!["ml", "deep learning"]),
            ("PyTorch", vec![]),
            ("TensorFlow", vec![]),
            ("Pandas", vec![]),
            ("NumPy", vec![]),
            ("Spark", vec!["pyspark", "apache spark"]),
            ("Airflow", vec!["apache airflow"]),
            ("LLM", vec!["llms", "large language models"]),
        ],
    )
}

fn practices() -> CatalogueCategory {
    category(
        "Practices",
        vec![
            ("CI/CD", vec!["continuous integration", "continuous delivery", "continuous deployment"]),
            ("Microservices", vec!["microservice"]),
            ("Agile", vec!["scrum", "kanban"]),
            ("TDD", vec!["test-driven development", "test driven development"]),
        ],
    )
}
