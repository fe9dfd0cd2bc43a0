mod form_file_tests;
