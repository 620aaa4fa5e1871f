fn main() {
    timewarp::term::main();
}
