use gridlogo::{Program, Registry};

fn main() {
    let prog = Program::parse("9 REPEAT 4 [ FD 3 RT 90 ]", Registry::standard()).unwrap();
    print!("{}", prog.run().unwrap());
}
