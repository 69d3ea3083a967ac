//! Built-in model registry
//!
//! Maps the display names offered on the chat page to the identifiers the
//! inference service expects.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub display_name: &'static str,
    pub backend_id: &'static str,
}

const MODELS: &[ModelSpec] = &[
    ModelSpec {
        display_name: "Llama 3.3 70B",
        backend_id: "llama-3.3-70b-versatile",
    },
    ModelSpec {
        display_name: "Llama 3.1 8B",
        backend_id: "llama-3.1-8b-instant",
    },
    ModelSpec {
        display_name: "Mixtral 8x7B",
        backend_id: "mixtral-8x7b-32768",
    },
    ModelSpec {
        display_name: "Gemma 2 9B",
        backend_id: "gemma2-9b-it",
    },
];

pub fn all_models() -> &'static [ModelSpec] {
    MODELS
}

pub fn default_model() -> &'static ModelSpec {
    &MODELS[0]
}

/// Find a model by display name or backend id (case-insensitive)
pub fn find_model(name: &str) -> Option<&'static ModelSpec> {
    let name = name.trim();
    MODELS.iter().find(|model| {
        model.display_name.eq_ignore_ascii_case(name) || model.backend_id.eq_ignore_ascii_case(name)
    })
}

pub fn next_model(current: &ModelSpec) -> &'static ModelSpec {
    let index = MODELS
        .iter()
        .position(|model| model.display_name == current.display_name)
        .map_or(0, |index| (index + 1) % MODELS.len());
    &MODELS[index]
}

pub fn model_names() -> Vec<&'static str> {
    MODELS.iter().map(|model| model.display_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_llama_70b() {
        let model = default_model();
        assert_eq!(model.display_name, "Llama 3.3 70B");
        assert_eq!(model.backend_id, "llama-3.3-70b-versatile");
    }

    #[test]
    fn find_model_accepts_display_name_or_backend_id() {
        assert_eq!(
            find_model("gemma 2 9b").map(|m| m.backend_id),
            Some("gemma2-9b-it")
        );
        assert_eq!(
            find_model("mixtral-8x7b-32768").map(|m| m.display_name),
            Some("Mixtral 8x7B")
        );
        assert!(find_model("gpt-4o").is_none());
    }

    #[test]
    fn next_model_cycles_through_registry() {
        let mut current = default_model();
        for _ in 0..all_models().len() {
            current = next_model(current);
        }
        assert_eq!(current, default_model());
    }
}
