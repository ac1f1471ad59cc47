use genseq::{Generator, Gn};

fn range12() -> Generator<'static, i32> {
    Gn::new_scoped(|mut s| async move {
        s.yield_(1).await;
        s.yield_(2).await;
    })
}

fn main() {
    for i in range12() {
        println!("{i}");
    }
}
