use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The fixed set of backend operations a client can request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Image,
    ImageUpgraded,
    TextGeneration,
    TextGenerationUpgraded,
    ImageClassification,
}

/// Determines both the payload a request must carry and how the backend
/// result is shaped into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationFamily {
    ImageGeneration,
    TextGeneration,
    Classification,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Image,
        Operation::ImageUpgraded,
        Operation::TextGeneration,
        Operation::TextGenerationUpgraded,
        Operation::ImageClassification,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Image => "image",
            Operation::ImageUpgraded => "imageUpgraded",
            Operation::TextGeneration => "textGeneration",
            Operation::TextGenerationUpgraded => "textGenerationUpgraded",
            Operation::ImageClassification => "imageClassification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn family(self) -> OperationFamily {
        match self {
            Operation::Image | Operation::ImageUpgraded => OperationFamily::ImageGeneration,
            Operation::TextGeneration | Operation::TextGenerationUpgraded => {
                OperationFamily::TextGeneration
            }
            Operation::ImageClassification => OperationFamily::Classification,
        }
    }

    /// Workers AI model used when the configuration does not override it.
    pub fn default_model(self) -> &'static str {
        match self {
            Operation::Image => "@cf/bytedance/stable-diffusion-xl-lightning",
            Operation::ImageUpgraded => "@cf/lykon/dreamshaper-8-lcm",
            Operation::TextGeneration => "@hf/thebloke/llama-2-13b-chat-awq",
            Operation::TextGenerationUpgraded => "@cf/meta/llama-3-8b-instruct",
            Operation::ImageClassification => "@cf/microsoft/resnet-50",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation to backend model identifier, fixed once built.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<Operation, String>,
}

impl ModelRegistry {
    pub fn new(overrides: &HashMap<Operation, String>) -> Self {
        let models = Operation::ALL
            .into_iter()
            .map(|op| {
                let model = overrides
                    .get(&op)
                    .cloned()
                    .unwrap_or_else(|| op.default_model().to_string());
                (op, model)
            })
            .collect();

        Self { models }
    }

    pub fn model_for(&self, operation: Operation) -> &str {
        self.models
            .get(&operation)
            .map(String::as_str)
            .unwrap_or_else(|| operation.default_model())
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}
