use stanza_parse::{Parser, Tokenizer, tokenize};
use std::io::Read;

fn main() {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();

    println!("=== Tokens ===");
    for tok in Tokenizer::new(&source) {
        match tok {
            Ok(tok) => println!("{:?} {:?}", tok, tok.text(&source)),
            Err(err) => {
                println!("{err}");
                return;
            }
        }
    }

    println!("\n=== Syntax ===");
    let tokens = tokenize(&source).unwrap();
    match Parser::new(&source, &tokens).parse_document() {
        Ok(syntax) => println!("{:#?}", syntax),
        Err(err) => println!("{err}"),
    }
}
