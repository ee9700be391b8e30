//! Prompt templates

/// Ask for a structured summary of a hackathon proposal
pub fn document_summary(document_text: &str) -> String {
    format!(
        r#"You are an AI assistant specialized in analyzing hackathon project proposals and presentations.

Analyze the following text extracted from a hackathon project document and provide a comprehensive summary with the following components:

1. Project Title: Extract or infer the title of the project
2. Problem Statement: What problem is the project trying to solve?
3. Project Summary: A concise overview of the project
4. Key Features: List the main features or components of the solution
5. Technical Stack: Identify any technologies, frameworks, or tools mentioned
6. Target Audience: Who would benefit from this solution?
7. Innovation Aspects: What makes this project innovative or unique?
8. Potential Impact: How might this project create value or impact?

Format your response as a structured JSON object with these exact field names:
{{
  "projectTitle": "Title here",
  "problemStatement": "Problem statement here",
  "projectSummary": "Summary here",
  "keyFeatures": ["Feature 1", "Feature 2", "Feature 3"],
  "technicalStack": ["Tech 1", "Tech 2", "Tech 3"],
  "targetAudience": "Target audience here",
  "innovationAspects": "Innovation aspects here",
  "potentialImpact": "Potential impact here"
}}

Ensure your response is valid JSON that can be parsed. Do not include any text outside the JSON object.

Here is the document text:
{document_text}
"#
    )
}

/// Ask for pros, cons and follow-up questions about a presentation
pub fn presentation_analysis(transcript: &str) -> String {
    format!(
        r#"Carefully read the following transcript.
Write a sharp, clear analysis using short, simple and direct sentences.
No formatting like lists, bullets or markdown inside the strings, just plain text.
Avoid fluff, filler or vague words. Be honest, objective and concise.

Your output must cover:
- 3 to 5 biggest strengths (only major positives)
- 3 to 5 real weaknesses or areas for improvement (be direct and critical if needed)
- 2 to 3 strong follow-up questions that show deeper thinking

Rules:
- Focus only on important points, not minor details
- Your response must contain points for every category
- Keep the tone professional, neutral and sharp
- If there is missing context or confusion, highlight it in cons

Return only JSON shaped like this:
{{
  "pros": ["pro1", "pro2", "pro3"],
  "cons": ["con1", "con2", "con3"],
  "suggestedQuestions": ["question1", "question2"]
}}

Transcript:
{transcript}"#
    )
}

/// Ask for a 0-100 score and feedback for one submission
pub fn submission_evaluation(submission_info: &str, judge_analysis: &str) -> String {
    format!(
        r#"You are an expert judge evaluating presentations. Analyze this presentation summary and provide:
1. A score out of 100 based on:
   - Clarity and organization (30 points)
   - Technical depth (30 points)
   - Innovation and creativity (20 points)
   - Presentation quality (20 points)
   - Analysis by judges (10 points)
2. Brief but specific feedback highlighting strengths and areas for improvement

Summary of the presentation:
{submission_info}

Analysis by judges:
{judge_analysis}

Format your response exactly like this example:
{{
  "score": 85,
  "feedback": "Strong technical implementation with clear architecture. Creative solution to X problem. Could improve Y aspect."
}}"#
    )
}
