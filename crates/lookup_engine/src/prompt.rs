/// Builds the generation prompt from the user's selection and the captured
/// page context.
pub fn build_prompt(selected_text: &str, page_context: &str) -> String {
    format!(
        r#"INSTRUCTIONS:
Act as a helpful, all-knowing assistant that explains the following text (in not more than 100 words) henceforth referred to as "selected text", that was selected from a webpage:

Focus on providing a clear, concise explanation of what the **selected text** means in the context of this webpage, and not the entire webpage. Also add a suggested reading section that includes the most relevant links in your opinion that are related to the selected text.
---
CONTEXT:
Here is the webpage content in Markdown format for context:
{page_context}

----
QUESTION:
What is the meaning of the following **selected text** in the context of this webpage: {selected_text}

IMPORTANT: Dont focus on explaining the article, just the selected text.
IMPORTANT: Don't ask preamble or postamble questions, just explain the selected text.
IMPORTANT: You should NOT answer with unnecessary preamble or postamble (such as summarizing your action), unless the user asks you to.
IMPORTANT: Keep your responses medium-length, since they will be displayed on a popup overlay. You MUST answer concisely with fewer than 10 lines, unless user asks for detail. Answer the user's question directly, without additional details. Five line answers are best. Avoid introductions and conclusions. You MUST avoid text before/after your response, such as "Okay, this is what the selected text means <answer>.", "Here is the content of the file..." or "Based on the information provided, the answer is..." or "Here is what I will do next...".
"#
    )
}
