//! Assistant dashboard
//!
//! Lists every assistant the platform offers and marks which ones are wired
//! to a configured endpoint.

use colored::Colorize;
use superbrain_domain::EndpointSet;

/// One dashboard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assistant {
    pub name: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub icon: &'static str,
    /// Endpoint id backing this assistant, if it is a single model
    pub endpoint: Option<&'static str>,
}

pub const ASSISTANTS: &[Assistant] = &[
    Assistant {
        name: "OpenAI Assistant",
        description: "Interact with GPT-4 and other OpenAI models",
        route: "/openai",
        icon: "🤖",
        endpoint: Some("openai"),
    },
    Assistant {
        name: "Claude Assistant",
        description: "Access Anthropic's Claude for advanced reasoning",
        route: "/claude",
        icon: "🧠",
        endpoint: Some("claude"),
    },
    Assistant {
        name: "Gemini Assistant",
        description: "Use Google's latest AI technology",
        route: "/gemini",
        icon: "☁️",
        endpoint: Some("gemini"),
    },
    Assistant {
        name: "Groq Assistant",
        description: "Experience ultra-fast AI responses",
        route: "/groq",
        icon: "⚡",
        endpoint: Some("groq"),
    },
    Assistant {
        name: "Venice Assistant",
        description: "Access Venice's powerful AI models",
        route: "/venice",
        icon: "🌊",
        endpoint: Some("venice"),
    },
    Assistant {
        name: "Local LLM",
        description: "Run AI models locally with Ollama",
        route: "/local-llm",
        icon: "💻",
        endpoint: Some("local-llm"),
    },
    Assistant {
        name: "Multi-Model Query",
        description: "Compare responses across different AI models",
        route: "/multi-model",
        icon: "🔄",
        endpoint: None,
    },
];

/// Renders the assistant list
pub struct Dashboard;

impl Dashboard {
    pub fn format(endpoints: &EndpointSet) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n{}\n\n",
            "SuperBrain AI Platform".cyan().bold(),
            "Access multiple AI models through a unified interface".dimmed()
        ));

        for assistant in ASSISTANTS {
            let available = Self::is_available(assistant, endpoints);
            let marker = if available {
                "[ready]".green()
            } else {
                "[     ]".dimmed()
            };
            output.push_str(&format!(
                "{} {} {}  {}\n      {}\n",
                marker,
                assistant.icon,
                assistant.name.bold(),
                assistant.route.dimmed(),
                assistant.description
            ));
        }

        output
    }

    /// Single-model assistants need their endpoint; the multi-model page is
    /// available whenever any endpoint is.
    pub fn is_available(assistant: &Assistant, endpoints: &EndpointSet) -> bool {
        match assistant.endpoint {
            Some(id) => endpoints.get(id).is_some(),
            None => !endpoints.is_empty(),
        }
    }
}
