use log::debug;
use rpncalc::{Calculator, CalculatorBuilder};

fn main() {
    pretty_env_logger::init();

    let mut calculator = Calculator::new();

    for expr in [
        "2 + 2 * 2",
        "2 ^ 2 ^ 3",
        "exp ( sin ( PI ) )",
        "atan2 ( 2 + 2 * 2 , log ( exp ( 6 ) ) )",
    ] {
        match calculator.evaluate(expr) {
            Ok(result) => println!("{expr} = {result}"),
            Err(err) => println!("Error: {err}"),
        }
    }

    calculator.define_function("f", "{0} * {0} + 1").unwrap();
    calculator.define_constant("tau", "2 * PI").unwrap();
    println!("f(3) = {}", calculator.evaluate("f(3)").unwrap());
    println!("ans / 2 = {}", calculator.evaluate("ans / 2").unwrap());
    calculator.save("five").unwrap();
    println!("tau - five = {}", calculator.evaluate("tau - five").unwrap());

    for (name, kind) in calculator.list_user_entries() {
        debug!("user entry {name}: {kind:?}");
    }

    if let Err(err) = calculator.evaluate("undefinedName ( 1 )") {
        println!("Error: {err}");
    }

    let mut shallow = CalculatorBuilder::new().max_recursion_depth(4).build();
    shallow.define_function("forever", "forever({0})").unwrap();
    if let Err(err) = shallow.evaluate("forever(1)") {
        println!("Error: {err}");
    }
}
