//! Interactive question loop: one question per line, `exit` quits.

use anyhow::Result;
use faq_qa::PipelineHandle;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::error;

pub async fn run(pipeline: &PipelineHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    loop {
        out.write_all(b"\nAsk a question (or type 'exit'): ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question.is_empty() {
            continue;
        }

        let answered = match pipeline.get().await {
            Ok(p) => p.answer(question, None).await,
            Err(e) => Err(e),
        };
        match answered {
            Ok(res) => {
                let mut text = String::from("\nTop FAQs:\n");
                for (i, hit) in res.top_faqs.iter().enumerate() {
                    text.push_str(&format!(
                        "{}. Q: {}\n   A: {}\n",
                        i + 1,
                        hit.record.question,
                        hit.record.answer
                    ));
                }
                text.push_str(&format!("\nAnswer:\n{}\n", res.model_answer));
                out.write_all(text.as_bytes()).await?;
            }
            // bad questions, build and model failures do not end the session
            Err(e) => {
                error!(error = %e, "console: answering failed");
                out.write_all(format!("Error: {e}\n").as_bytes()).await?;
            }
        }
    }
    Ok(())
}
