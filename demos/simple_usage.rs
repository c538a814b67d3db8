/// Simple example demonstrating how to use the Review Extractor library

use anyhow::Result;
use review_extractor::app::answer_query;
use review_extractor::{convert_reviews, InvertedIndex};

fn main() -> Result<()> {
    let work_dir = std::env::temp_dir().join("review_extractor_demo");
    std::fs::create_dir_all(&work_dir)?;

    // Create sample file
    let csv_path = work_dir.join("sample_reviews.csv");
    std::fs::write(
        &csv_path,
        r#"Id,ProductId,UserId,ProfileName,HelpfulnessNumerator,HelpfulnessDenominator,Score,Time,Summary,Text
1,B001E4KFG0,A3SGXH7AUHU8GW,delmartian,1,1,5,1303862400,Good Quality Dog Food,"I have bought several of the Vitality canned dog food products."
2,B00813GRG4,A1D87F6ZCVE5NK,dll pa,0,0,1,1346976000,Not as Advertised,"Product arrived labeled as Jumbo Salted Peanuts."
"#,
    )?;

    let output_dir = work_dir.join("review_text");
    println!("Converting {} into {}", csv_path.display(), output_dir.display());

    // Running twice shows the second pass skipping every file
    for pass in 1..=2 {
        let summary = convert_reviews(&csv_path, &output_dir)?;
        println!(
            "pass {}: {} rows, {} created, {} skipped",
            pass, summary.total_rows, summary.created, summary.skipped
        );
    }

    println!("\n{}", std::fs::read_to_string(output_dir.join("review_1.txt"))?);

    // Search the written files
    let index = InvertedIndex::build(&output_dir)?;
    for query in ["dog", "+dog +food", "product -peanuts"] {
        println!("> {}\n{}", query, answer_query(&index, query));
    }

    Ok(())
}
