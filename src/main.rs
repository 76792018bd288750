fn main() -> Result<(), Box<dyn std::error::Error>> {
    chatdeck::cli::main()
}
