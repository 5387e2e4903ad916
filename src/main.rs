use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    shanai::cli::main()
}
