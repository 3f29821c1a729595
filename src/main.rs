//! # Planche CLI
//!
//! Usage:
//!   planche input.json -o layout.json
//!   echo '{ ... }' | planche -o layout.json
//!   planche --example > lesson.json

use std::env;
use std::fs;
use std::io::{self, Read};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_lesson_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "layout.json".to_string());

    // Compose
    match planche::compose_json(&input) {
        Ok(layout_json) => {
            fs::write(&output_path, &layout_json).expect("Failed to write layout");
            eprintln!("✓ Written {} bytes to {}", layout_json.len(), output_path);
        }
        Err(e) => {
            eprintln!("✗ Failed to compose page: {}", e);
            std::process::exit(1);
        }
    }
}

fn example_lesson_json() -> &'static str {
    r##"{
  "template": {
    "settings": {
      "fontFamily": "Helvetica",
      "fontSize": 11.0,
      "paperSize": "A4",
      "orientation": "Portrait"
    },
    "blocks": [
      { "id": "header", "order": 0, "type": "header",
        "config": { "name": true, "date": true, "class": true, "subject": false } },
      { "id": "program", "order": 1, "type": "program",
        "config": { "method": true, "socialForm": true, "time": true } },
      { "id": "resources", "order": 2, "type": "resources",
        "config": { "quantity": true, "note": false } },
      { "id": "work", "order": 3, "type": "content",
        "config": { "ruled": true },
        "content": "Write a one-paragraph summary of the fable." },
      { "id": "footer", "order": 4, "type": "footer",
        "config": { "pageNumber": true, "school": true } }
    ]
  },
  "lesson": {
    "competencies": [
      {
        "name": "Reading comprehension",
        "topics": [
          {
            "name": "Fables",
            "objectives": [
              {
                "name": "Retell the plot of a fable",
                "method": "Group discussion",
                "socialForm": "Pairs",
                "time": "15 min",
                "tasks": [
                  { "name": "Read 'The Fox and the Grapes' aloud" },
                  { "name": "Identify the moral", "socialForm": "Plenary", "time": "10 min" }
                ]
              },
              {
                "name": "Compare two fables",
                "method": "Worksheet",
                "socialForm": "Individual",
                "time": "20 min"
              }
            ]
          }
        ]
      }
    ],
    "resources": [
      { "name": "Fable anthology", "quantity": "1 per pair" },
      { "name": "Comparison worksheet", "quantity": "1 per student" }
    ]
  },
  "devicePixelRatio": 1.0
}"##
}
