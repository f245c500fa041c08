// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the HuggingFace Inference API.

use serde::{Deserialize, Serialize};

/// Outbound request body: `{"inputs": .., "parameters": {..}}`.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a, P> {
    pub inputs: &'a str,
    pub parameters: P,
}

/// Sampling parameters for text generation.
#[derive(Debug, Clone, Serialize)]
pub struct TextParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    /// Suppresses echoing the prompt back in `generated_text`.
    pub return_full_text: bool,
}

/// Diffusion parameters for image generation.
#[derive(Debug, Clone, Serialize)]
pub struct ImageParameters {
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
}

/// Error body returned by the Inference API, usually `{"error": "..."}`.
///
/// The field is sometimes a string and sometimes a structured value
/// (e.g. a list of validation messages), so it is kept as raw JSON.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: serde_json::Value,
}

impl ApiErrorBody {
    /// Renders the error payload as a flat message.
    pub fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_request_serializes_inputs_and_parameters() {
        let request = InferenceRequest {
            inputs: "a red panda",
            parameters: ImageParameters {
                num_inference_steps: 30,
                guidance_scale: 7.5,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "a red panda");
        assert_eq!(json["parameters"]["num_inference_steps"], 30);
        assert_eq!(json["parameters"]["guidance_scale"], 7.5);
    }

    #[test]
    fn text_parameters_carry_return_full_text() {
        let params = TextParameters {
            max_new_tokens: 512,
            temperature: 0.7,
            top_p: 0.95,
            return_full_text: false,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["return_full_text"], false);
    }

    #[test]
    fn api_error_body_flattens_string_and_structured_errors() {
        let plain: ApiErrorBody =
            serde_json::from_str(r#"{"error": "Model is overloaded"}"#).unwrap();
        assert_eq!(plain.message(), "Model is overloaded");

        let structured: ApiErrorBody =
            serde_json::from_str(r#"{"error": ["inputs too long", "try again"]}"#).unwrap();
        assert!(structured.message().contains("inputs too long"));
    }
}
