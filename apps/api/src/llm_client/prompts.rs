// Shared prompt constants.
// Each module that needs Gateway calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant for federal \
    government contract staffing. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every instruction that declares an output shape.
pub const SHAPE_INSTRUCTION: &str = "\
    Return ONLY a JSON object matching the OUTPUT SCHEMA exactly. \
    Use the exact field names shown. Omit nothing that is marked required.";
