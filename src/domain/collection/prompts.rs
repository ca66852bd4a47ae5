//! Prompt templates for question generation, answer evaluation and
//! answer conversion.

use super::state::Message;
use super::target::{ExampleShape, TargetField};

/// Prompt asking the model for the next question about `target`.
pub fn question_prompt(target: &TargetField) -> String {
    format!(
        r#"<goal>
    You collect information from a user. The item to collect is:
    <name>{name}</name>
    <description>{description}</description>
    <example>{example}</example>
</goal>

<task>
    Write one question that collects the item in <goal>.
    Use the description and example; mention the example if it helps the user see what kind of answer is expected.
</task>

<output>
    Reply with the question only.
    No reasoning, no preamble, no XML tags, nothing after the question.
</output>
"#,
        name = target.name,
        description = target.description,
        example = target.example.to_pretty_json(),
    )
}

/// Prompt asking the model to judge whether the conversation fills `target`.
pub fn evaluation_prompt(target: &TargetField, messages: &[Message]) -> String {
    format!(
        r#"<goal>
    You collect specific information from a user. The item to collect is:
    <name>{name}</name>
    <description>{description}</description>
    <example>{example}</example> (reference only, never evidence)
</goal>

<task>
    Decide whether <messages> fulfils <goal>.
    <messages>{messages}</messages>
</task>

<rules>
    1. Judge only on what the user explicitly wrote in <messages>.
    2. Do not infer, assume or invent anything that was not stated.
    3. Never use <example> as evidence.
    4. SUFFICIENT only when the user gave clearly relevant, usable information.
    5. INSUFFICIENT when the answer is vague or uncertain ("hmm", "maybe", "not sure"), states ignorance ("I don't know"), or is irrelevant.
</rules>

<output>
    Reply with exactly one of these XML blocks:

    <sufficient>
        <code>SUFFICIENT</code>
        <reason>Why the stated information meets the requirement.</reason>
        <result>The fields the user provided and their values.</result>
    </sufficient>

    <insufficient>
        <code>INSUFFICIENT</code>
        <reason>Why the information is insufficient (vague, unclear, irrelevant).</reason>
        <result>Precise questions that collect the missing information.</result>
    </insufficient>
</output>
"#,
        name = target.name,
        description = target.description,
        example = target.example.to_pretty_json(),
        messages = render_transcript(messages),
    )
}

/// Prompt asking the model to convert `answer` into the shape of `target.example`.
pub fn conversion_prompt(target: &TargetField, answer: &str) -> String {
    match &target.example {
        ExampleShape::Object(_) => object_conversion_prompt(target, answer),
        ExampleShape::List(_) => list_conversion_prompt(target, answer),
        ExampleShape::Scalar(_) => scalar_conversion_prompt(target, answer),
    }
}

fn object_conversion_prompt(target: &TargetField, answer: &str) -> String {
    format!(
        r#"<goal>
    Convert the user's plain-text answer into a JSON object.
    <name>{name}</name>
    <description>{description}</description>
    <example>
    ```json
    {example}
    ```
    </example>
    <keys>{keys}</keys>
</goal>

<task>
    Build a JSON object with exactly the keys of the example, filled from the user input.
    <user_input>
    ```
    {answer}
    ```
    </user_input>
</task>

<output>
    Return only the JSON object. It must be valid JSON.
</output>
"#,
        name = target.name,
        description = target.description,
        example = target.example.to_pretty_json(),
        keys = target.example.field_names().join(", "),
        answer = answer,
    )
}

fn list_conversion_prompt(target: &TargetField, answer: &str) -> String {
    let fields = target.example.field_names();
    let structure = if fields.is_empty() {
        "Follow the format of each example item".to_string()
    } else {
        format!("Each item has the keys: {}", fields.join(", "))
    };

    format!(
        r#"<goal>
    Convert the user's plain-text answer into a JSON array.
    <name>{name}</name>
    <description>{description}</description>
    <example>
    ```json
    {example}
    ```
    </example>
    <structure>{structure}</structure>
</goal>

<task>
    Split the user input into separate items (paragraphs, numbered points, bullets) and map each to the example item format.
    <user_input>
    ```
    {answer}
    ```
    </user_input>
</task>

<output>
    Return only the JSON array. It must be valid JSON.
</output>
"#,
        name = target.name,
        description = target.description,
        example = target.example.to_pretty_json(),
        structure = structure,
        answer = answer,
    )
}

fn scalar_conversion_prompt(target: &TargetField, answer: &str) -> String {
    format!(
        r#"<goal>
    Tidy up the user's answer.
    <name>{name}</name>
    <description>{description}</description>
    <example>"{example}"</example>
</goal>

<task>
    Keep the user's core message, drop repetition, and match the style and length of the example.
    <user_input>
    ```
    {answer}
    ```
    </user_input>
</task>

<output>
    Return only the refined text.
</output>
"#,
        name = target.name,
        description = target.description,
        example = target.example.scalar_text(),
        answer = answer,
    )
}

/// Renders the visible history as `role: content` lines.
fn render_transcript(messages: &[Message]) -> String {
    let lines: Vec<String> = messages
        .iter()
        .filter(|m| m.role.is_visible())
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect();
    format!("\n{}\n    ", lines.join("\n"))
}
