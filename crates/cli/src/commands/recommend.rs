use toolfinder_agent::Recommender;
use toolfinder_core::{RecommendError, RecommendationResult};

use crate::commands::{prepare, CommandResult};

const RULE: &str = "--------------------------------------------------";

pub fn run(query: &str, ai: bool, json_output: bool) -> CommandResult {
    let prepared = match prepare("recommend") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let outcome = prepared.runtime.block_on(execute(&prepared.recommender, query, ai));
    match outcome {
        Ok(result) if json_output => match serde_json::to_string_pretty(&result) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure("recommend", "serialization", error.to_string(), 6),
        },
        Ok(result) => CommandResult { exit_code: 0, output: render_human(&result) },
        Err(RecommendError::EmptyQuery) => CommandResult::failure(
            "recommend",
            "invalid_query",
            RecommendError::EmptyQuery.to_string(),
            5,
        ),
        Err(error) => CommandResult::failure("recommend", "internal", error.to_string(), 6),
    }
}

pub async fn execute(
    recommender: &Recommender,
    query: &str,
    ai: bool,
) -> Result<RecommendationResult, RecommendError> {
    if ai {
        recommender.find_with_ai(query).await
    } else {
        recommender.recommend(query).await
    }
}

pub fn render_human(result: &RecommendationResult) -> String {
    let mut lines =
        vec![format!("Found {} AI tools for: '{}'", result.total_found, result.query)];
    if let Some(source) = &result.source {
        lines.push(format!("Source: {source}"));
    }
    lines.push(RULE.to_string());

    if result.tools.is_empty() {
        lines.push("No relevant tools found. Please try a different query.".to_string());
        return lines.join("\n");
    }

    for (index, tool) in result.tools.iter().enumerate() {
        lines.push(format!("{}. {}", index + 1, tool.name));
        lines.push(format!("   Link: {}", tool.link));
        lines.push(format!("   Description: {}", tool.description));
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}
