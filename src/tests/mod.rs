mod form {
    mod keyword_tests;
    mod navigation_tests;
    mod record_tests;
}

mod submit {
    mod controller_tests;
}

mod validation {
    mod message_tests;
}
