fn main() {
    simjob::app::cli::run();
}
