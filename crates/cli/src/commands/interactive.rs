use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use toolfinder_agent::Recommender;

use crate::commands::recommend::render_human;
use crate::commands::{prepare, CommandResult};

const PROMPT: &str = "Enter your query (or 'quit' to exit): ";
const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

pub fn run() -> CommandResult {
    let prepared = match prepare("interactive") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let outcome = prepared.runtime.block_on(async {
        let input = BufReader::new(tokio::io::stdin());
        let mut output = tokio::io::stdout();
        session(&prepared.recommender, input, &mut output).await
    });

    match outcome {
        Ok(_) => CommandResult { exit_code: 0, output: "Goodbye!".to_string() },
        Err(error) => CommandResult::failure("interactive", "io", error.to_string(), 7),
    }
}

/// Runs the prompt loop until an exit word or end of input; returns how many
/// queries were answered.
pub async fn session<R, W>(
    recommender: &Recommender,
    mut input: R,
    output: &mut W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut answered = 0;
    let mut line = String::new();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break;
        }

        let query = line.trim();
        if EXIT_WORDS.contains(&query.to_lowercase().as_str()) {
            break;
        }
        if query.is_empty() {
            output.write_all(b"Please enter a valid query.\n").await?;
            continue;
        }

        let block = match recommender.recommend(query).await {
            Ok(result) => {
                answered += 1;
                render_human(&result)
            }
            Err(error) => format!("Error: {error}"),
        };
        output.write_all(format!("\n{block}\n\n").as_bytes()).await?;
    }

    output.flush().await?;
    Ok(answered)
}
