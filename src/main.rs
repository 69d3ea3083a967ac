fn main() -> Result<(), Box<dyn std::error::Error>> {
    stephen_wolf::cli::main()
}
